/// Generational handle: a slot index plus the generation the slot had when
/// the handle was issued. A handle to a freed slot never matches a later
/// occupant of the same slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u32, u32); // (index, generation)

impl Handle {
    pub fn new(index: u32, generation: u32) -> Self {
        Handle(index, generation)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    pub fn generation(&self) -> u32 {
        self.1
    }

    /// Handle for the same slot after it has been freed and reused.
    pub fn next_generation(&self) -> Self {
        Handle(self.0, self.1.wrapping_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::Handle;

    #[test]
    fn next_generation_keeps_index() {
        let h = Handle::new(7, 0);
        let n = h.next_generation();
        assert_eq!(n.index(), 7);
        assert_eq!(n.generation(), 1);
        assert_ne!(h, n);
    }
}

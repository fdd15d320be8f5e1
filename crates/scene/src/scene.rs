use crate::object::{ObjectId, SceneObject};
use foundation::handles::Handle;

/// The mutation surface the overlay engine needs from a live scene.
///
/// The engine only adds, replaces and removes its own objects; the scene's
/// lifetime belongs to the viewer.
pub trait SceneHandle {
    fn add(&mut self, object: SceneObject) -> ObjectId;

    /// Removes the object, or returns `None` if `id` is stale.
    fn remove(&mut self, id: ObjectId) -> Option<SceneObject>;

    /// Swaps the object stored under `id` in place. A stale `id` hands the
    /// object back as the error.
    fn replace(&mut self, id: ObjectId, object: SceneObject) -> Result<(), SceneObject>;
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    object: Option<SceneObject>,
}

/// Slot-map scene store with generational object ids.
#[derive(Debug, Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.0.generation() {
            return None;
        }
        slot.object.as_ref()
    }

    /// Live objects in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            let object = slot.object.as_ref()?;
            Some((ObjectId(Handle::new(idx as u32, slot.generation)), object))
        })
    }

    pub fn overlay_objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.iter().filter(|(_, o)| o.overlay.is_some())
    }

    pub fn overlay_count(&self) -> usize {
        self.overlay_objects().count()
    }

    fn slot_mut(&mut self, id: ObjectId) -> Option<&mut Slot> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.0.generation() || slot.object.is_none() {
            return None;
        }
        Some(slot)
    }
}

impl SceneHandle for Scene {
    fn add(&mut self, object: SceneObject) -> ObjectId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.object = Some(object);
            return ObjectId(Handle::new(index, slot.generation));
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            object: Some(object),
        });
        ObjectId(Handle::new(index, 0))
    }

    fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let slot = self.slot_mut(id)?;
        let object = slot.object.take();
        slot.generation = id.0.next_generation().generation();
        self.free.push(id.index());
        self.len -= 1;
        object
    }

    fn replace(&mut self, id: ObjectId, object: SceneObject) -> Result<(), SceneObject> {
        match self.slot_mut(id) {
            Some(slot) => {
                slot.object = Some(object);
                Ok(())
            }
            None => Err(object),
        }
    }
}

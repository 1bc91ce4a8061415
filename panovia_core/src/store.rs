//! Arena-style storage for hotspot records.
//!
//! Insertion order is preserved and is load-bearing: the order of root
//! hotspots defines the guided tour chain. Ids are issued by the store from a
//! monotonic watermark; id 0 is reserved as nil and is never issued. Parents
//! are fixed at insertion time — there is no way to re-parent a hotspot.

use crate::hotspot::Hotspot;
use indexmap::IndexMap;
use panovia_ids::HotspotId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Debug, Default)]
pub struct HotspotStore {
    hotspots: IndexMap<HotspotId, Hotspot>,
    next_id: u32,
}

impl HotspotStore {
    pub fn new() -> Self {
        Self {
            hotspots: IndexMap::new(),
            next_id: 1,
        }
    }

    /// Rebuild a store from persisted records, keeping their ids and order.
    /// The id watermark resumes past the highest persisted id.
    pub fn from_hotspots(hotspots: impl IntoIterator<Item = Hotspot>) -> Self {
        let hotspots: IndexMap<HotspotId, Hotspot> =
            hotspots.into_iter().map(|h| (h.id(), h)).collect();
        let max_id = hotspots.keys().map(|id| id.as_u32()).max().unwrap_or(0);
        Self {
            hotspots,
            next_id: max_id.saturating_add(1).max(1),
        }
    }

    /// Insert a draft hotspot under the given parent, assigning its id.
    /// The watermark never moves backwards, so removed ids are not re-issued
    /// and soft-orphaned parent references can never be adopted by a new
    /// hotspot.
    pub fn insert(&mut self, mut draft: Hotspot, parent: Option<HotspotId>) -> HotspotId {
        let id = HotspotId::from_u32(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        draft.attach(id, parent);
        self.hotspots.insert(id, draft);
        id
    }

    /// Remove a hotspot. Descendants are not removed; they become orphans
    /// that no scene graph will reach.
    pub fn remove(&mut self, id: HotspotId) -> Option<Hotspot> {
        self.hotspots.shift_remove(&id)
    }

    #[inline]
    pub fn get(&self, id: HotspotId) -> Option<&Hotspot> {
        self.hotspots.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: HotspotId) -> Option<&mut Hotspot> {
        self.hotspots.get_mut(&id)
    }

    #[inline]
    pub fn contains(&self, id: HotspotId) -> bool {
        self.hotspots.contains_key(&id)
    }

    /// Hotspots placed in the scene identified by `parent` (`None` = the
    /// root scene), in insertion order.
    pub fn children_of(&self, parent: Option<HotspotId>) -> impl Iterator<Item = &Hotspot> {
        self.hotspots.values().filter(move |h| h.parent() == parent)
    }

    /// The top-level chain: hotspots with no parent, in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &Hotspot> {
        self.children_of(None)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hotspot> {
        self.hotspots.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hotspots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hotspots.is_empty()
    }

    /// Snapshot of the records in insertion order (the persisted shape).
    pub fn to_vec(&self) -> Vec<Hotspot> {
        self.hotspots.values().cloned().collect()
    }
}

impl Serialize for HotspotStore {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.hotspots.values())
    }
}

impl<'de> Deserialize<'de> for HotspotStore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hotspots = Vec::<Hotspot>::deserialize(deserializer)?;
        Ok(Self::from_hotspots(hotspots))
    }
}

impl FromIterator<Hotspot> for HotspotStore {
    fn from_iter<T: IntoIterator<Item = Hotspot>>(iter: T) -> Self {
        Self::from_hotspots(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotspot::ImageRef;

    fn connected(text: &str) -> Hotspot {
        Hotspot::new(0.0, 0.0, text).with_target(ImageRef::from("pano.jpg"))
    }

    #[test]
    fn insert_assigns_sequential_nonzero_ids() {
        let mut store = HotspotStore::new();
        let a = store.insert(Hotspot::new(0.0, 0.0, "A"), None);
        let b = store.insert(Hotspot::new(0.0, 0.0, "B"), None);
        assert!(!a.is_nil());
        assert!(!b.is_nil());
        assert_ne!(a, b);
        assert_eq!(store.get(a).unwrap().text, "A");
        assert_eq!(store.get(b).unwrap().text, "B");
    }

    #[test]
    fn removed_ids_are_never_reissued() {
        let mut store = HotspotStore::new();
        let a = store.insert(Hotspot::new(0.0, 0.0, "A"), None);
        let b = store.insert(Hotspot::new(0.0, 0.0, "B"), None);
        store.remove(b);
        let c = store.insert(Hotspot::new(0.0, 0.0, "C"), None);
        assert_ne!(c, a);
        assert_ne!(c, b);
    }

    #[test]
    fn insertion_order_survives_removal() {
        let mut store = HotspotStore::new();
        let _a = store.insert(Hotspot::new(0.0, 0.0, "A"), None);
        let b = store.insert(Hotspot::new(0.0, 0.0, "B"), None);
        let _c = store.insert(Hotspot::new(0.0, 0.0, "C"), None);
        store.remove(b);
        let order: Vec<&str> = store.roots().map(|h| h.text.as_str()).collect();
        assert_eq!(order, ["A", "C"]);
    }

    #[test]
    fn children_of_scans_in_insertion_order() {
        let mut store = HotspotStore::new();
        let a = store.insert(connected("A"), None);
        let _x = store.insert(Hotspot::new(0.0, 0.0, "X"), Some(a));
        let _b = store.insert(Hotspot::new(0.0, 0.0, "B"), None);
        let _y = store.insert(Hotspot::new(0.0, 0.0, "Y"), Some(a));

        let kids: Vec<&str> = store.children_of(Some(a)).map(|h| h.text.as_str()).collect();
        assert_eq!(kids, ["X", "Y"]);

        let roots: Vec<&str> = store.roots().map(|h| h.text.as_str()).collect();
        assert_eq!(roots, ["A", "B"]);
    }

    #[test]
    fn remove_does_not_cascade() {
        // Soft-orphan behavior: descendants of a removed hotspot stay in the
        // store even though nothing can reach them anymore.
        let mut store = HotspotStore::new();
        let a = store.insert(connected("A"), None);
        let child = store.insert(Hotspot::new(0.0, 0.0, "child"), Some(a));
        store.remove(a);
        assert!(store.get(child).is_some());
        assert_eq!(store.get(child).unwrap().parent(), Some(a));
    }

    #[test]
    fn serde_roundtrip_preserves_order_ids_and_watermark() {
        let mut store = HotspotStore::new();
        let a = store.insert(connected("A"), None);
        let _child = store.insert(Hotspot::new(1.0, 2.0, "child"), Some(a));
        let b = store.insert(Hotspot::new(0.0, 0.0, "B"), None);
        store.remove(b);

        let json = serde_json::to_string(&store).unwrap();
        let mut back: HotspotStore = serde_json::from_str(&json).unwrap();

        let order: Vec<HotspotId> = back.iter().map(|h| h.id()).collect();
        let expected: Vec<HotspotId> = store.iter().map(|h| h.id()).collect();
        assert_eq!(order, expected);

        // Watermark resumes past the highest persisted id.
        let d = back.insert(Hotspot::new(0.0, 0.0, "D"), None);
        assert!(d.as_u32() > a.as_u32());
        assert!(!store.contains(d));
    }

    #[test]
    fn empty_store_roundtrip() {
        let store = HotspotStore::new();
        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, "[]");
        let back: HotspotStore = serde_json::from_str(&json).unwrap();
        assert!(back.is_empty());
    }
}

use std::collections::HashMap;

use stream_types::{DEFAULT_SOURCE_TITLE, FrameInfo};

/**
    Captured frames, most recent first.

    The collection belongs to the application rather than to a playback
    session, so frames survive source changes until deleted.
*/
#[derive(Debug, Clone, Default)]
pub struct FrameCollection {
    frames: Vec<FrameInfo>,
}

/**
    Frames captured from one source, ordered by playback position.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct FrameGroup<'a> {
    pub source_url: &'a str,
    pub frames: Vec<&'a FrameInfo>,
    /// Whether this is the source currently playing.
    pub is_current: bool,
}

impl FrameGroup<'_> {
    pub fn title(&self) -> &str {
        self.frames
            .first()
            .map(|f| f.source_title.as_str())
            .unwrap_or(DEFAULT_SOURCE_TITLE)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, frame: FrameInfo) {
        self.frames.insert(0, frame);
    }

    /**
        Remove the frame with the given id. Unknown ids are ignored.
    */
    pub fn remove(&mut self, id: &str) -> Option<FrameInfo> {
        let index = self.frames.iter().position(|f| f.id == id)?;
        Some(self.frames.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&FrameInfo> {
        self.frames.iter().find(|f| f.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameInfo> {
        self.frames.iter()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /**
        Group frames by source.

        Groups appear in the order their source first occurs in the
        collection, except that the group for `current_source` comes first.
        Frames within a group are sorted by playback position.
    */
    pub fn groups(&self, current_source: Option<&str>) -> Vec<FrameGroup<'_>> {
        let mut groups: Vec<FrameGroup<'_>> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for frame in &self.frames {
            let url = frame.source_url.as_str();
            let slot = *index.entry(url).or_insert_with(|| {
                groups.push(FrameGroup {
                    source_url: url,
                    frames: Vec::new(),
                    is_current: current_source == Some(url),
                });
                groups.len() - 1
            });
            groups[slot].frames.push(frame);
        }

        for group in &mut groups {
            group
                .frames
                .sort_by(|a, b| a.current_time.total_cmp(&b.current_time));
        }

        // Stable, so the remaining groups keep their order
        groups.sort_by_key(|g| !g.is_current);
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(id: &str, source: &str, at: f64) -> FrameInfo {
        FrameInfo {
            id: id.to_string(),
            timestamp: 1_700_000_000_000,
            current_time: at,
            width: 1280,
            height: 720,
            image_data: "data:image/jpeg;base64,AAAA".to_string(),
            source_url: source.to_string(),
            source_title: format!("Title {}", source),
        }
    }

    fn times(group: &FrameGroup<'_>) -> Vec<f64> {
        group.frames.iter().map(|f| f.current_time).collect()
    }

    #[test]
    fn insert_prepends() {
        let mut collection = FrameCollection::new();
        collection.insert(frame("a", "A", 1.0));
        collection.insert(frame("b", "A", 2.0));
        let ids: Vec<&str> = collection.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn groups_sorted_by_position_regardless_of_insertion() {
        let orders = [
            vec![frame("1", "A", 2.0), frame("2", "A", 1.0), frame("3", "B", 3.0)],
            vec![frame("3", "B", 3.0), frame("2", "A", 1.0), frame("1", "A", 2.0)],
        ];

        for frames in orders {
            let mut collection = FrameCollection::new();
            for f in frames {
                collection.insert(f);
            }

            let groups = collection.groups(None);
            assert_eq!(groups.len(), 2);
            let a = groups.iter().find(|g| g.source_url == "A").unwrap();
            let b = groups.iter().find(|g| g.source_url == "B").unwrap();
            assert_eq!(times(a), vec![1.0, 2.0]);
            assert_eq!(times(b), vec![3.0]);
            assert_eq!(a.title(), "Title A");
        }
    }

    #[test]
    fn current_source_group_first() {
        let mut collection = FrameCollection::new();
        collection.insert(frame("1", "A", 1.0));
        collection.insert(frame("2", "B", 1.0));
        collection.insert(frame("3", "C", 1.0));

        let groups = collection.groups(Some("B"));
        let urls: Vec<&str> = groups.iter().map(|g| g.source_url).collect();
        assert_eq!(urls, vec!["B", "C", "A"]);
        assert!(groups[0].is_current);
        assert!(!groups[1].is_current);

        let groups = collection.groups(Some("Z"));
        assert!(groups.iter().all(|g| !g.is_current));
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut collection = FrameCollection::new();
        collection.insert(frame("1", "A", 1.0));
        collection.insert(frame("2", "A", 2.0));
        let before: Vec<FrameInfo> = collection.iter().cloned().collect();

        assert!(collection.remove("missing").is_none());
        let after: Vec<FrameInfo> = collection.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn remove_deletes_one_record() {
        let mut collection = FrameCollection::new();
        collection.insert(frame("1", "A", 1.0));
        collection.insert(frame("2", "A", 2.0));

        let removed = collection.remove("1").unwrap();
        assert_eq!(removed.id, "1");
        assert_eq!(collection.len(), 1);
        assert!(collection.get("1").is_none());
        assert!(collection.get("2").is_some());
    }

    #[test]
    fn empty_collection_has_no_groups() {
        assert!(FrameCollection::new().groups(Some("A")).is_empty());
    }
}

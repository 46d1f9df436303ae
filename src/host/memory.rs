//! In-memory track used for headless runs and tests.
//!
//! Nodes live in an arena and the wrapper keeps their order. Removed nodes
//! free their slot for the next clone. Every mutation and observer
//! transition is counted so callers can check exactly what the filler and
//! controller did to the "document".

use super::{ItemBox, Stage, TrackHost};
use crate::error::ReelError;

/// One node of the in-memory track.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryNode {
    /// Arena id.
    pub id: usize,
    /// Id of the base item this node was cloned from (itself for items).
    pub source: usize,
    /// Tag name, matched by bare selectors.
    pub tag: String,
    /// Class list, matched by `.class` selectors.
    pub classes: Vec<String>,
    /// Layout box.
    pub item: ItemBox,
}

impl MemoryNode {
    fn matches(&self, selector: &str) -> bool {
        match selector.strip_prefix('.') {
            Some(class) => self.classes.iter().any(|c| c == class),
            None => selector == "*" || self.tag == selector,
        }
    }
}

/// Connect/disconnect bookkeeping for one observer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObserverLog {
    /// Number of connect calls.
    pub connects: usize,
    /// Number of disconnect calls.
    pub disconnects: usize,
}

impl ObserverLog {
    /// Connected and not yet disconnected.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.connects > self.disconnects
    }
}

/// Headless [`TrackHost`] + [`Stage`] implementation.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    container: String,
    wrapper: Option<String>,
    container_width: f64,
    nodes: Vec<Option<MemoryNode>>,
    free: Vec<usize>,
    children: Vec<usize>,
    offset: Option<f64>,
    hints_active: bool,
    overflow_clipped: bool,
    scroll: f64,
    resize: ObserverLog,
    visibility: ObserverLog,
    clones_created: usize,
    clone_limit: Option<usize>,
    nodes_removed: usize,
}

impl MemoryHost {
    /// Empty container named `container` with the given width.
    #[must_use]
    pub fn new(container: &str, container_width: f64) -> Self {
        Self {
            container: container.to_owned(),
            wrapper: None,
            container_width,
            nodes: Vec::new(),
            free: Vec::new(),
            children: Vec::new(),
            offset: None,
            hints_active: false,
            overflow_clipped: false,
            scroll: 0.0,
            resize: ObserverLog::default(),
            visibility: ObserverLog::default(),
            clones_created: 0,
            clone_limit: None,
            nodes_removed: 0,
        }
    }

    /// Name an inner wrapper that [`TrackHost::bind`] will accept.
    #[must_use]
    pub fn with_wrapper(mut self, wrapper: &str) -> Self {
        self.wrapper = Some(wrapper.to_owned());
        self
    }

    /// Append `div.item` nodes with the given widths and no margins.
    #[must_use]
    pub fn with_items(mut self, widths: &[f64]) -> Self {
        for &width in widths {
            let _ = self.push_item(
                ItemBox {
                    width,
                    ..ItemBox::default()
                },
                "item",
            );
        }
        self
    }

    /// Fail every clone request once `limit` clones have been created.
    #[must_use]
    pub fn with_clone_limit(mut self, limit: usize) -> Self {
        self.clone_limit = Some(limit);
        self
    }

    /// Append one item with an explicit box and class. Returns its id.
    pub fn push_item(&mut self, item: ItemBox, class: &str) -> usize {
        let id = self.allocate(|id| MemoryNode {
            id,
            source: id,
            tag: "div".to_owned(),
            classes: vec![class.to_owned()],
            item,
        });
        self.children.push(id);
        id
    }

    fn allocate(&mut self, build: impl FnOnce(usize) -> MemoryNode) -> usize {
        if let Some(id) = self.free.pop() {
            self.nodes[id] = Some(build(id));
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(Some(build(id)));
        id
    }

    fn node(&self, id: usize) -> Option<&MemoryNode> {
        self.nodes.get(id).and_then(Option::as_ref)
    }

    /// Arena slots in use, attached or not.
    #[must_use]
    pub fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Resize the container.
    pub fn set_container_width(&mut self, width: f64) {
        self.container_width = width;
    }

    /// Change the layout box of an existing node.
    pub fn set_item_box(&mut self, id: usize, item: ItemBox) {
        if let Some(Some(node)) = self.nodes.get_mut(id) {
            node.item = item;
        }
    }

    /// Move the page scroll position.
    pub fn set_scroll_position(&mut self, y: f64) {
        self.scroll = y;
    }

    /// Wrapper children in order.
    pub fn children(&self) -> impl Iterator<Item = &MemoryNode> {
        self.children.iter().filter_map(|id| self.node(*id))
    }

    /// Attached nodes carrying `class_name`.
    #[must_use]
    pub fn count_with_class(&self, class_name: &str) -> usize {
        self.children()
            .filter(|n| n.classes.iter().any(|c| c == class_name))
            .count()
    }

    /// Last applied wrapper translation, if any.
    #[must_use]
    pub fn offset(&self) -> Option<f64> {
        self.offset
    }

    /// Whether compositor hints are currently applied.
    #[must_use]
    pub fn hints_active(&self) -> bool {
        self.hints_active
    }

    /// Whether the container overflow is clipped.
    #[must_use]
    pub fn overflow_clipped(&self) -> bool {
        self.overflow_clipped
    }

    /// Resize observer bookkeeping.
    #[must_use]
    pub fn resize_observer(&self) -> ObserverLog {
        self.resize
    }

    /// Visibility observer bookkeeping.
    #[must_use]
    pub fn visibility_observer(&self) -> ObserverLog {
        self.visibility
    }

    /// Total clones created so far.
    #[must_use]
    pub fn clones_created(&self) -> usize {
        self.clones_created
    }

    /// Total nodes removed so far.
    #[must_use]
    pub fn nodes_removed(&self) -> usize {
        self.nodes_removed
    }
}

impl TrackHost for MemoryHost {
    type Node = usize;

    fn bind(&mut self, container: &str, wrapper: Option<&str>) -> Result<(), ReelError> {
        if container != self.container {
            return Err(ReelError::MissingContainer(container.to_owned()));
        }
        if let Some(wrapper) = wrapper {
            if self.wrapper.as_deref() != Some(wrapper) {
                return Err(ReelError::MissingWrapper(wrapper.to_owned()));
            }
        }
        Ok(())
    }

    fn container_width(&self) -> f64 {
        self.container_width
    }

    fn query_items(&self, selector: Option<&str>) -> Vec<usize> {
        self.children()
            .filter(|node| selector.map_or(true, |s| node.matches(s)))
            .map(|node| node.id)
            .collect()
    }

    fn measure(&self, node: &usize) -> ItemBox {
        self.node(*node).map(|n| n.item).unwrap_or_default()
    }

    fn clone_item(&mut self, item: &usize, class_name: &str) -> Result<usize, ReelError> {
        if self.clone_limit.is_some_and(|limit| self.clones_created >= limit) {
            return Err(ReelError::Host(format!("cannot clone node {item}")));
        }
        let template = self.node(*item).cloned();
        let id = self.allocate(|id| {
            let mut copy = template.unwrap_or_else(|| MemoryNode {
                id,
                source: *item,
                tag: "div".to_owned(),
                classes: Vec::new(),
                item: ItemBox::default(),
            });
            copy.id = id;
            if !copy.classes.iter().any(|c| c == class_name) {
                copy.classes.push(class_name.to_owned());
            }
            copy
        });
        self.clones_created += 1;
        Ok(id)
    }

    fn append(&mut self, nodes: &[usize]) {
        self.children.extend_from_slice(nodes);
    }

    fn remove(&mut self, node: &usize) {
        if let Some(pos) = self.children.iter().position(|id| id == node) {
            let _ = self.children.remove(pos);
            if let Some(slot) = self.nodes.get_mut(*node) {
                *slot = None;
                self.free.push(*node);
            }
            self.nodes_removed += 1;
        }
    }

    fn connect_resize(&mut self) {
        self.resize.connects += 1;
    }

    fn disconnect_resize(&mut self) {
        self.resize.disconnects += 1;
    }
}

impl Stage for MemoryHost {
    fn set_overflow_clip(&mut self, clip: bool) {
        self.overflow_clipped = clip;
    }

    fn set_idle_hints(&mut self, idle: bool) {
        self.hints_active = !idle;
    }

    fn set_offset(&mut self, x: f64) {
        self.offset = Some(x);
    }

    fn clear_motion(&mut self) {
        self.offset = None;
        self.hints_active = false;
    }

    fn connect_visibility(&mut self) {
        self.visibility.connects += 1;
    }

    fn disconnect_visibility(&mut self) {
        self.visibility.disconnects += 1;
    }

    fn scroll_position(&self) -> f64 {
        self.scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_checks_container_and_wrapper() {
        let mut host = MemoryHost::new("#reel", 500.0).with_wrapper(".track");
        assert!(host.bind("#reel", None).is_ok());
        assert!(host.bind("#reel", Some(".track")).is_ok());
        assert!(matches!(
            host.bind("#other", None),
            Err(ReelError::MissingContainer(_))
        ));
        assert!(matches!(
            host.bind("#reel", Some(".missing")),
            Err(ReelError::MissingWrapper(_))
        ));
    }

    #[test]
    fn query_matches_class_and_tag() {
        let mut host = MemoryHost::new("#reel", 500.0).with_items(&[10.0, 20.0]);
        let _ = host.push_item(ItemBox::default(), "badge");
        assert_eq!(host.query_items(Some(".item")), vec![0, 1]);
        assert_eq!(host.query_items(Some("div")).len(), 3);
        assert_eq!(host.query_items(None).len(), 3);
    }

    #[test]
    fn clones_are_tagged_and_appended() {
        let mut host = MemoryHost::new("#reel", 500.0).with_items(&[10.0]);
        let copy = host.clone_item(&0, "-clone").unwrap();
        host.append(&[copy]);

        let nodes: Vec<_> = host.children().collect();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].source, 0);
        assert_eq!(nodes[1].classes, vec!["item", "-clone"]);
        assert_eq!(host.count_with_class("-clone"), 1);

        host.remove(&copy);
        assert_eq!(host.count_with_class("-clone"), 0);
        assert_eq!(host.nodes_removed(), 1);
    }

    #[test]
    fn removed_slots_are_reused() {
        let mut host = MemoryHost::new("#reel", 500.0).with_items(&[10.0, 20.0]);
        for _ in 0..50 {
            let copy = host.clone_item(&1, "-clone").unwrap();
            host.append(&[copy]);
            host.remove(&copy);
        }
        assert_eq!(host.live_nodes(), 2);
        assert_eq!(host.clones_created(), 50);

        let copy = host.clone_item(&1, "-clone").unwrap();
        host.append(&[copy]);
        let last = host.children().last().unwrap();
        assert_eq!(last.source, 1);
        assert_eq!(last.item.width, 20.0);
    }

    #[test]
    fn clone_limit_fails_further_clones() {
        let mut host = MemoryHost::new("#reel", 500.0)
            .with_items(&[10.0])
            .with_clone_limit(1);
        assert!(host.clone_item(&0, "-clone").is_ok());
        assert!(matches!(
            host.clone_item(&0, "-clone"),
            Err(ReelError::Host(_))
        ));
    }
}

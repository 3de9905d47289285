//! Canvas model: placed items and canvas dimensions.

use crate::catalog::{PropertyValue, PropertyValues};
use crate::config::DEFAULT_CANVAS_SIZE;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifier of a placed item.
pub type ItemId = String;

/// One element instance on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub id: ItemId,
    /// Name of the catalog element this item instantiates.
    #[serde(rename = "type")]
    pub kind: String,
    /// Left edge in canvas units.
    pub x: f64,
    /// Top edge in canvas units.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub properties: PropertyValues,
}

impl PlacedItem {
    /// Create an item with no properties.
    pub fn new(
        id: impl Into<ItemId>,
        kind: impl Into<String>,
        position: Point,
        size: Size,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
            properties: PropertyValues::new(),
        }
    }

    pub fn with_properties(mut self, properties: PropertyValues) -> Self {
        self.properties = properties;
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Whether `point` lies inside the item's box, edges included.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

/// Ordered item collection plus canvas size.
///
/// Order is insertion order, which is also back-to-front drawing order.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasState {
    items: Vec<PlacedItem>,
    canvas_size: Size,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_SIZE)
    }
}

impl CanvasState {
    /// Create an empty canvas.
    pub fn new(canvas_size: Size) -> Self {
        Self {
            items: Vec::new(),
            canvas_size,
        }
    }

    /// Build a canvas from existing items, keeping the first item for each id.
    pub fn from_items(items: Vec<PlacedItem>, canvas_size: Size) -> Self {
        let mut canvas = Self::new(canvas_size);
        for item in items {
            if !canvas.push(item.clone()) {
                log::warn!("Dropping item with duplicate id '{}'", item.id);
            }
        }
        canvas
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    pub fn set_canvas_size(&mut self, size: Size) {
        self.canvas_size = size;
    }

    /// Items in z-order (back to front).
    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Append an item on top. Returns false (and leaves the canvas unchanged)
    /// if the id is already taken.
    pub fn push(&mut self, item: PlacedItem) -> bool {
        if self.contains(&item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn get(&self, id: &str) -> Option<&PlacedItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut PlacedItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Move an item in place. Returns false if the id is unknown.
    pub fn move_item(&mut self, id: &str, position: Point) -> bool {
        match self.get_mut(id) {
            Some(item) => {
                item.set_position(position);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<PlacedItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// First item, in collection order, whose box contains `point`.
    ///
    /// Collection order means the bottom-most of overlapping items wins.
    pub fn hit_test(&self, point: Point) -> Option<&PlacedItem> {
        self.items.iter().find(|item| item.contains(point))
    }

    /// Bounding box of all items.
    pub fn bounds(&self) -> Option<Rect> {
        self.items
            .iter()
            .map(PlacedItem::bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }

    /// Generate an id for an item created at `timestamp_millis`.
    ///
    /// The id is `item-<millis>`, suffixed with a counter when several items
    /// are created within the same millisecond.
    pub fn next_id(&self, timestamp_millis: i64) -> ItemId {
        let base = format!("item-{}", timestamp_millis);
        if !self.contains(&base) {
            return base;
        }
        let taken: HashSet<&str> = self.items.iter().map(|item| item.id.as_str()).collect();
        (1..)
            .map(|n| format!("{}-{}", base, n))
            .find(|candidate| !taken.contains(candidate.as_str()))
            .unwrap_or(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, x: f64, y: f64) -> PlacedItem {
        PlacedItem::new(id, "round-table", Point::new(x, y), Size::new(100.0, 100.0))
    }

    #[test]
    fn test_contains_is_inclusive() {
        let item = item("a", 100.0, 100.0);
        assert!(item.contains(Point::new(100.0, 100.0)));
        assert!(item.contains(Point::new(200.0, 200.0)));
        assert!(!item.contains(Point::new(200.1, 150.0)));
    }

    #[test]
    fn test_push_rejects_duplicate_ids() {
        let mut canvas = CanvasState::default();
        assert!(canvas.push(item("a", 0.0, 0.0)));
        assert!(!canvas.push(item("a", 40.0, 40.0)));
        assert_eq!(canvas.len(), 1);
        assert!((canvas.get("a").unwrap().x - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_prefers_first_inserted() {
        let mut canvas = CanvasState::default();
        canvas.push(item("a", 0.0, 0.0));
        canvas.push(item("b", 50.0, 50.0));
        assert_eq!(canvas.hit_test(Point::new(75.0, 75.0)).unwrap().id, "a");
        assert_eq!(canvas.hit_test(Point::new(140.0, 140.0)).unwrap().id, "b");
        assert!(canvas.hit_test(Point::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn test_move_and_remove() {
        let mut canvas = CanvasState::default();
        canvas.push(item("a", 0.0, 0.0));
        canvas.push(item("b", 20.0, 20.0));

        assert!(canvas.move_item("a", Point::new(60.0, 80.0)));
        assert!(!canvas.move_item("missing", Point::ZERO));
        assert_eq!(canvas.get("a").unwrap().position(), Point::new(60.0, 80.0));

        let removed = canvas.remove("a").unwrap();
        assert_eq!(removed.id, "a");
        assert!(canvas.remove("a").is_none());
        assert_eq!(canvas.items()[0].id, "b");
    }

    #[test]
    fn test_next_id_is_unique() {
        let mut canvas = CanvasState::default();
        let first = canvas.next_id(1700);
        assert_eq!(first, "item-1700");
        canvas.push(item(&first, 0.0, 0.0));

        let second = canvas.next_id(1700);
        assert_eq!(second, "item-1700-1");
        canvas.push(item(&second, 0.0, 0.0));

        assert_eq!(canvas.next_id(1700), "item-1700-2");
        assert_eq!(canvas.next_id(1701), "item-1701");
    }

    #[test]
    fn test_from_items_drops_duplicates() {
        let canvas = CanvasState::from_items(
            vec![item("a", 0.0, 0.0), item("a", 20.0, 0.0), item("b", 0.0, 0.0)],
            Size::new(800.0, 600.0),
        );
        assert_eq!(canvas.len(), 2);
        assert!((canvas.get("a").unwrap().x - 0.0).abs() < f64::EPSILON);
        assert_eq!(canvas.canvas_size(), Size::new(800.0, 600.0));
    }

    #[test]
    fn test_bounds() {
        let mut canvas = CanvasState::default();
        assert!(canvas.bounds().is_none());
        canvas.push(item("a", 0.0, 0.0));
        canvas.push(item("b", 200.0, 40.0));
        assert_eq!(canvas.bounds(), Some(Rect::new(0.0, 0.0, 300.0, 140.0)));
    }

    #[test]
    fn test_item_json_uses_type_key() {
        let json = serde_json::to_value(item("a", 20.0, 40.0)).unwrap();
        assert_eq!(json["type"], "round-table");
        assert_eq!(json["x"], 20.0);
        let back: PlacedItem = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, "a");
    }
}

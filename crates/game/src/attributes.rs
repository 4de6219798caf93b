//! Character attributes and unspent points

use mana_core::{AttributeId, Fixed256, TILE_SIZE};
use std::collections::BTreeMap;

/// Attribute holding the movement speed in tiles per second
pub const MOVE_SPEED_ATTRIBUTE: AttributeId = AttributeId(16);

/// Convert a speed in tiles per second to pixels per second
#[inline]
pub fn tps_to_pixels(tps: f64) -> f32 {
    (tps * TILE_SIZE as f64) as f32
}

/// Base and modified magnitude of one attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeValue {
    pub base: Fixed256,
    pub modified: Fixed256,
}

#[derive(Debug, Default)]
pub struct Attributes {
    values: BTreeMap<AttributeId, AttributeValue>,
    attribute_points: u16,
    correction_points: u16,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite an attribute
    pub fn set(&mut self, id: AttributeId, base: Fixed256, modified: Fixed256) {
        self.values.insert(id, AttributeValue { base, modified });
    }

    #[inline]
    pub fn get(&self, id: AttributeId) -> Option<&AttributeValue> {
        self.values.get(&id)
    }

    /// Walk speed in pixels per second derived from the modified move speed
    pub fn walk_speed(&self) -> Option<f32> {
        self.get(MOVE_SPEED_ATTRIBUTE)
            .map(|value| tps_to_pixels(value.modified.to_f64()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttributeId, &AttributeValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn attribute_points(&self) -> u16 {
        self.attribute_points
    }

    #[inline]
    pub fn correction_points(&self) -> u16 {
        self.correction_points
    }

    /// Store unspent points
    ///
    /// # Returns
    /// Which of the two values changed, as `(attribute, correction)`
    pub fn set_points(&mut self, attribute: u16, correction: u16) -> (bool, bool) {
        let changed = (
            self.attribute_points != attribute,
            self.correction_points != correction,
        );
        self.attribute_points = attribute;
        self.correction_points = correction;
        changed
    }

    /// Forget all values and points
    pub fn clear(&mut self) {
        self.values.clear();
        self.attribute_points = 0;
        self.correction_points = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites() {
        let mut attributes = Attributes::new();
        let id = AttributeId::new(1);
        attributes.set(id, Fixed256::from_int(5), Fixed256::from_int(6));
        attributes.set(id, Fixed256::from_int(7), Fixed256::from_raw(1920));
        let value = attributes.get(id).unwrap();
        assert_eq!(value.base.to_f64(), 7.0);
        assert_eq!(value.modified.to_f64(), 7.5);
        assert_eq!(attributes.len(), 1);
    }

    #[test]
    fn test_walk_speed_from_modified() {
        let mut attributes = Attributes::new();
        assert_eq!(attributes.walk_speed(), None);
        attributes.set(MOVE_SPEED_ATTRIBUTE, Fixed256::from_int(4), Fixed256::from_raw(6 * 256 + 128));
        assert_eq!(attributes.walk_speed(), Some(208.0));
    }

    #[test]
    fn test_points_report_changes() {
        let mut attributes = Attributes::new();
        assert_eq!(attributes.set_points(3, 0), (true, false));
        assert_eq!(attributes.set_points(3, 1), (false, true));
        attributes.clear();
        assert_eq!(attributes.attribute_points(), 0);
    }
}

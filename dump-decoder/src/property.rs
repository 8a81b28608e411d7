//! Canonical per-atom field identifiers and their record slots
//!
//! Both decoders consult a single table that maps each identifier to its
//! numeric kind and periodic-wrap policy. This keeps the per-field logic in
//! one place instead of duplicating branches in the text and binary paths.

use crate::types::{AtomData, DumpError, Result};

/// Numeric kind of a field's slot in [`AtomData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    /// Stored as `i64`; binary values are truncated toward zero
    Integer,
    /// Stored as `f64`
    Float,
}

/// How a field's value relates to the periodic boundary correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapPolicy {
    /// Never corrected (ids, velocities, unwrapped coordinates, ...)
    Never,
    /// Unscaled coordinate, wrapped into the box `[lo, hi)` on this axis
    Box { axis: usize },
    /// Scaled coordinate, wrapped into `[0, 1)` on this axis
    Fractional { axis: usize },
}

/// A decodable per-atom property from the closed canonical set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Id,
    Type,
    Mol,
    Mass,
    X,
    Y,
    Z,
    Xs,
    Ys,
    Zs,
    Xu,
    Yu,
    Zu,
    Xsu,
    Ysu,
    Zsu,
    Ix,
    Iy,
    Iz,
    Vx,
    Vy,
    Vz,
    Fx,
    Fy,
    Fz,
    Q,
    Mux,
    Muy,
    Muz,
    Mu,
}

struct Descriptor {
    name: &'static str,
    kind: NumericKind,
    wrap: WrapPolicy,
}

// Ordered exactly like the Property enum so the descriptor lookup can
// index by discriminant.
static TABLE: [Descriptor; 30] = {
    use NumericKind::{Float, Integer};
    use WrapPolicy::{Box, Fractional, Never};
    [
        Descriptor { name: "id", kind: Integer, wrap: Never },
        Descriptor { name: "type", kind: Integer, wrap: Never },
        Descriptor { name: "mol", kind: Integer, wrap: Never },
        Descriptor { name: "mass", kind: Float, wrap: Never },
        Descriptor { name: "x", kind: Float, wrap: Box { axis: 0 } },
        Descriptor { name: "y", kind: Float, wrap: Box { axis: 1 } },
        Descriptor { name: "z", kind: Float, wrap: Box { axis: 2 } },
        Descriptor { name: "xs", kind: Float, wrap: Fractional { axis: 0 } },
        Descriptor { name: "ys", kind: Float, wrap: Fractional { axis: 1 } },
        Descriptor { name: "zs", kind: Float, wrap: Fractional { axis: 2 } },
        Descriptor { name: "xu", kind: Float, wrap: Never },
        Descriptor { name: "yu", kind: Float, wrap: Never },
        Descriptor { name: "zu", kind: Float, wrap: Never },
        Descriptor { name: "xsu", kind: Float, wrap: Never },
        Descriptor { name: "ysu", kind: Float, wrap: Never },
        Descriptor { name: "zsu", kind: Float, wrap: Never },
        Descriptor { name: "ix", kind: Integer, wrap: Never },
        Descriptor { name: "iy", kind: Integer, wrap: Never },
        Descriptor { name: "iz", kind: Integer, wrap: Never },
        Descriptor { name: "vx", kind: Float, wrap: Never },
        Descriptor { name: "vy", kind: Float, wrap: Never },
        Descriptor { name: "vz", kind: Float, wrap: Never },
        Descriptor { name: "fx", kind: Float, wrap: Never },
        Descriptor { name: "fy", kind: Float, wrap: Never },
        Descriptor { name: "fz", kind: Float, wrap: Never },
        Descriptor { name: "q", kind: Float, wrap: Never },
        Descriptor { name: "mux", kind: Float, wrap: Never },
        Descriptor { name: "muy", kind: Float, wrap: Never },
        Descriptor { name: "muz", kind: Float, wrap: Never },
        Descriptor { name: "mu", kind: Float, wrap: Never },
    ]
};

impl Property {
    /// All canonical properties, in table order.
    pub const ALL: [Property; 30] = [
        Property::Id,
        Property::Type,
        Property::Mol,
        Property::Mass,
        Property::X,
        Property::Y,
        Property::Z,
        Property::Xs,
        Property::Ys,
        Property::Zs,
        Property::Xu,
        Property::Yu,
        Property::Zu,
        Property::Xsu,
        Property::Ysu,
        Property::Zsu,
        Property::Ix,
        Property::Iy,
        Property::Iz,
        Property::Vx,
        Property::Vy,
        Property::Vz,
        Property::Fx,
        Property::Fy,
        Property::Fz,
        Property::Q,
        Property::Mux,
        Property::Muy,
        Property::Muz,
        Property::Mu,
    ];

    fn descriptor(self) -> &'static Descriptor {
        &TABLE[self as usize]
    }

    /// Resolve a canonical identifier; `None` for anything outside the set.
    pub fn parse(name: &str) -> Option<Property> {
        Property::ALL
            .iter()
            .copied()
            .find(|p| p.descriptor().name == name)
    }

    /// The canonical identifier for this property.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Numeric kind of the slot this property occupies.
    pub fn kind(self) -> NumericKind {
        self.descriptor().kind
    }

    /// Periodic wrap policy applied when emitting this property.
    pub fn wrap_policy(self) -> WrapPolicy {
        self.descriptor().wrap
    }

    /// Write a value into this property's slot.
    pub fn store(self, atom: &mut AtomData, value: FieldValue) {
        match self {
            Property::Id => atom.id = value.as_int(),
            Property::Type => atom.atom_type = value.as_int(),
            Property::Mol => atom.mol = value.as_int(),
            Property::Mass => atom.mass = value.as_float(),
            Property::X => atom.x = value.as_float(),
            Property::Y => atom.y = value.as_float(),
            Property::Z => atom.z = value.as_float(),
            Property::Xs => atom.xs = value.as_float(),
            Property::Ys => atom.ys = value.as_float(),
            Property::Zs => atom.zs = value.as_float(),
            Property::Xu => atom.xu = value.as_float(),
            Property::Yu => atom.yu = value.as_float(),
            Property::Zu => atom.zu = value.as_float(),
            Property::Xsu => atom.xsu = value.as_float(),
            Property::Ysu => atom.ysu = value.as_float(),
            Property::Zsu => atom.zsu = value.as_float(),
            Property::Ix => atom.ix = value.as_int(),
            Property::Iy => atom.iy = value.as_int(),
            Property::Iz => atom.iz = value.as_int(),
            Property::Vx => atom.vx = value.as_float(),
            Property::Vy => atom.vy = value.as_float(),
            Property::Vz => atom.vz = value.as_float(),
            Property::Fx => atom.fx = value.as_float(),
            Property::Fy => atom.fy = value.as_float(),
            Property::Fz => atom.fz = value.as_float(),
            Property::Q => atom.q = value.as_float(),
            Property::Mux => atom.mux = value.as_float(),
            Property::Muy => atom.muy = value.as_float(),
            Property::Muz => atom.muz = value.as_float(),
            Property::Mu => atom.mu = value.as_float(),
        }
    }

    /// Read the value currently held in this property's slot.
    pub fn load(self, atom: &AtomData) -> FieldValue {
        match self {
            Property::Id => FieldValue::Int(atom.id),
            Property::Type => FieldValue::Int(atom.atom_type),
            Property::Mol => FieldValue::Int(atom.mol),
            Property::Mass => FieldValue::Float(atom.mass),
            Property::X => FieldValue::Float(atom.x),
            Property::Y => FieldValue::Float(atom.y),
            Property::Z => FieldValue::Float(atom.z),
            Property::Xs => FieldValue::Float(atom.xs),
            Property::Ys => FieldValue::Float(atom.ys),
            Property::Zs => FieldValue::Float(atom.zs),
            Property::Xu => FieldValue::Float(atom.xu),
            Property::Yu => FieldValue::Float(atom.yu),
            Property::Zu => FieldValue::Float(atom.zu),
            Property::Xsu => FieldValue::Float(atom.xsu),
            Property::Ysu => FieldValue::Float(atom.ysu),
            Property::Zsu => FieldValue::Float(atom.zsu),
            Property::Ix => FieldValue::Int(atom.ix),
            Property::Iy => FieldValue::Int(atom.iy),
            Property::Iz => FieldValue::Int(atom.iz),
            Property::Vx => FieldValue::Float(atom.vx),
            Property::Vy => FieldValue::Float(atom.vy),
            Property::Vz => FieldValue::Float(atom.vz),
            Property::Fx => FieldValue::Float(atom.fx),
            Property::Fy => FieldValue::Float(atom.fy),
            Property::Fz => FieldValue::Float(atom.fz),
            Property::Q => FieldValue::Float(atom.q),
            Property::Mux => FieldValue::Float(atom.mux),
            Property::Muy => FieldValue::Float(atom.muy),
            Property::Muz => FieldValue::Float(atom.muz),
            Property::Mu => FieldValue::Float(atom.mu),
        }
    }
}

/// A typed field value on its way into or out of an [`AtomData`] slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
}

impl FieldValue {
    /// Interpret a raw binary double according to the field's kind.
    /// Integer kinds truncate toward zero, as the binary format requires.
    pub fn from_raw(kind: NumericKind, raw: f64) -> FieldValue {
        match kind {
            NumericKind::Integer => FieldValue::Int(raw as i64),
            NumericKind::Float => FieldValue::Float(raw),
        }
    }

    /// The value as an integer, truncating a float toward zero.
    pub fn as_int(self) -> i64 {
        match self {
            FieldValue::Int(v) => v,
            FieldValue::Float(v) => v as i64,
        }
    }

    /// The value as a float.
    pub fn as_float(self) -> f64 {
        match self {
            FieldValue::Int(v) => v as f64,
            FieldValue::Float(v) => v,
        }
    }
}

/// Parse a whitespace-separated field-spec string into properties.
///
/// The spec is validated in full before any decoding starts, so an
/// unknown identifier always fails before an atom hook can fire.
pub fn parse_field_spec(spec: &str) -> Result<Vec<Property>> {
    spec.split_whitespace()
        .map(|name| Property::parse(name).ok_or_else(|| DumpError::UnknownField(name.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for prop in Property::ALL {
            assert_eq!(Property::parse(prop.name()), Some(prop));
        }
    }

    #[test]
    fn test_unknown_identifiers_rejected() {
        assert_eq!(Property::parse("vq"), None);
        assert_eq!(Property::parse("X"), None); // case-sensitive
        assert_eq!(Property::parse(""), None);
    }

    #[test]
    fn test_numeric_kinds() {
        assert_eq!(Property::Id.kind(), NumericKind::Integer);
        assert_eq!(Property::Ix.kind(), NumericKind::Integer);
        assert_eq!(Property::Mass.kind(), NumericKind::Float);
        assert_eq!(Property::Q.kind(), NumericKind::Float);
    }

    #[test]
    fn test_wrap_policies() {
        assert_eq!(Property::X.wrap_policy(), WrapPolicy::Box { axis: 0 });
        assert_eq!(Property::Zs.wrap_policy(), WrapPolicy::Fractional { axis: 2 });
        // Unwrapped coordinates must never be corrected.
        assert_eq!(Property::Xu.wrap_policy(), WrapPolicy::Never);
        assert_eq!(Property::Ysu.wrap_policy(), WrapPolicy::Never);
        assert_eq!(Property::Vx.wrap_policy(), WrapPolicy::Never);
    }

    #[test]
    fn test_store_and_load() {
        let mut atom = AtomData::default();
        Property::Id.store(&mut atom, FieldValue::Int(42));
        Property::X.store(&mut atom, FieldValue::Float(1.25));
        Property::Type.store(&mut atom, FieldValue::Float(3.9)); // truncates
        assert_eq!(atom.id, 42);
        assert_eq!(atom.x, 1.25);
        assert_eq!(atom.atom_type, 3);
        assert_eq!(Property::Id.load(&atom), FieldValue::Int(42));
        assert_eq!(Property::X.load(&atom), FieldValue::Float(1.25));
    }

    #[test]
    fn test_from_raw_truncates_integers() {
        assert_eq!(FieldValue::from_raw(NumericKind::Integer, 7.9), FieldValue::Int(7));
        assert_eq!(FieldValue::from_raw(NumericKind::Integer, -2.9), FieldValue::Int(-2));
        assert_eq!(FieldValue::from_raw(NumericKind::Float, 7.9), FieldValue::Float(7.9));
    }

    #[test]
    fn test_parse_field_spec() {
        let fields = parse_field_spec("id type x y z").unwrap();
        assert_eq!(
            fields,
            vec![Property::Id, Property::Type, Property::X, Property::Y, Property::Z]
        );

        let err = parse_field_spec("id bogus x").unwrap_err();
        assert!(matches!(err, DumpError::UnknownField(ref f) if f == "bogus"));

        assert!(parse_field_spec("").unwrap().is_empty());
    }
}

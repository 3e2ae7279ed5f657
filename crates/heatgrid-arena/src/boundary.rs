//! Initial and boundary conditions.

use crate::field::LocalField;

/// Value held by the top boundary row.
pub const TOP_BOUNDARY: f64 = 1.0;

/// How the fixed boundary cells of a field are initialised.
///
/// In every profile the top padded row is [`TOP_BOUNDARY`] and the bottom
/// row and interior start at zero. The profiles differ only on the global
/// left and right edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BoundaryProfile {
    /// Left and right global edges hold 0.0 (top corners excepted).
    #[default]
    Zero,
    /// Left and right global edges hold a linear ramp `y · dy` over every
    /// padded row, top row included.
    Ramp,
}

impl BoundaryProfile {
    /// Write the initial state into `field`.
    ///
    /// `left_edge` / `right_edge` say whether the field's ghost columns sit
    /// on the global domain edge (no neighbour on that side). Ghost columns
    /// facing a neighbour are zeroed; the first halo exchange fills them.
    pub fn apply(self, field: &mut LocalField, dy: f64, left_edge: bool, right_edge: bool) {
        let shape = field.shape();
        field.as_mut_slice().fill(0.0);

        let top = shape.top_row();
        for x in 0..shape.stride() {
            field.set(x, top, TOP_BOUNDARY);
        }

        if self == Self::Ramp {
            let mut edges = Vec::with_capacity(2);
            if left_edge {
                edges.push(0);
            }
            if right_edge {
                edges.push(shape.right_ghost());
            }
            for x in edges {
                for y in 0..shape.padded_rows() {
                    field.set(x, y, y as f64 * dy);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::LocalShape;

    #[test]
    fn zero_profile_sets_only_top_row() {
        let s = LocalShape::new(3, 3);
        let mut f = LocalField::zeros(s);
        BoundaryProfile::Zero.apply(&mut f, 0.25, true, true);
        for x in 0..s.stride() {
            assert_eq!(f.get(x, s.top_row()), 1.0);
            for y in 0..s.top_row() {
                assert_eq!(f.get(x, y), 0.0);
            }
        }
    }

    #[test]
    fn ramp_profile_only_on_global_edges() {
        let s = LocalShape::new(2, 3);
        let mut f = LocalField::zeros(s);
        BoundaryProfile::Ramp.apply(&mut f, 0.25, true, false);
        for y in 0..s.padded_rows() {
            assert_eq!(f.get(0, y), y as f64 * 0.25);
        }
        // Right ghost faces a neighbour: untouched by the ramp.
        assert_eq!(f.get(s.right_ghost(), 2), 0.0);
        assert_eq!(f.get(s.right_ghost(), s.top_row()), 1.0);
        assert_eq!(f.get(1, s.top_row()), 1.0);
    }

    #[test]
    fn apply_resets_previous_contents() {
        let s = LocalShape::new(2, 2);
        let mut f = LocalField::zeros(s);
        f.as_mut_slice().fill(7.0);
        BoundaryProfile::Zero.apply(&mut f, 0.5, false, false);
        assert_eq!(f.get(1, 1), 0.0);
    }
}

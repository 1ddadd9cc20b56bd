use super::vector::Pt;

/// Maximum |cos| between the two edges for a box to count as right-angled.
pub const PERPENDICULAR_TOLERANCE: f64 = 1e-3;

/// Rectangle given by three clockwise corners `A, B, C` plus the interior
/// sub-goal `target`. Edge data is computed once at construction.
///
/// `new` does not check that `AB` is perpendicular to `BC`; a skewed box gives a
/// parallelogram containment test. [`OrientedBox::is_well_formed`] reports it.
#[derive(Clone, Debug, PartialEq)]
pub struct OrientedBox {
    a: Pt,
    b: Pt,
    c: Pt,
    target: Pt,
    ab: Pt,
    dot_ab: f64,
    bc: Pt,
    dot_bc: f64,
}

impl OrientedBox {
    pub fn new(a: Pt, b: Pt, c: Pt, target: Pt) -> Self {
        let ab = b - a;
        let bc = c - b;
        Self { a, b, c, target, ab, dot_ab: ab.dot(ab), bc, dot_bc: bc.dot(bc) }
    }

    /// Two-edge projection test. Boundary points are inside.
    pub fn point_is_inside(&self, m: Pt) -> bool {
        let on_ab = self.ab.dot(m - self.a);
        let on_bc = self.bc.dot(m - self.b);
        (0.0..=self.dot_ab).contains(&on_ab) && (0.0..=self.dot_bc).contains(&on_bc)
    }

    /// Distance from `m` to the nearest edge, measured along the box axes.
    /// Negative when `m` is outside. Assumes a well-formed box.
    pub fn inset_depth(&self, m: Pt) -> f64 {
        let len_ab = self.dot_ab.sqrt();
        let len_bc = self.dot_bc.sqrt();
        let along_ab = self.ab.dot(m - self.a) / len_ab;
        let along_bc = self.bc.dot(m - self.b) / len_bc;
        along_ab.min(len_ab - along_ab).min(along_bc).min(len_bc - along_bc)
    }

    /// Non-zero edges meeting at a right angle (within [`PERPENDICULAR_TOLERANCE`]).
    pub fn is_well_formed(&self) -> bool {
        if self.dot_ab <= 0.0 || self.dot_bc <= 0.0 {
            return false;
        }
        let cos = self.ab.dot(self.bc) / (self.dot_ab.sqrt() * self.dot_bc.sqrt());
        cos.abs() < PERPENDICULAR_TOLERANCE
    }

    pub fn a(&self) -> Pt { self.a }
    pub fn b(&self) -> Pt { self.b }
    pub fn c(&self) -> Pt { self.c }

    /// Fourth corner, opposite `B`.
    pub fn d(&self) -> Pt {
        self.a + self.bc
    }

    pub fn corners(&self) -> [Pt; 4] {
        [self.a, self.b, self.c, self.d()]
    }

    pub fn target(&self) -> Pt { self.target }

    pub fn edge_ab(&self) -> Pt { self.ab }
    pub fn edge_bc(&self) -> Pt { self.bc }
    pub fn dot_ab(&self) -> f64 { self.dot_ab }
    pub fn dot_bc(&self) -> f64 { self.dot_bc }

    // Rendering-only quantities below.

    pub fn width(&self) -> f64 {
        self.dot_bc.sqrt()
    }

    pub fn height(&self) -> f64 {
        self.dot_ab.sqrt()
    }

    pub fn origin(&self) -> Pt {
        self.a
    }

    /// Drawing rotation in degrees: `180 - atan2(A.x - B.x, A.y - B.y)`.
    pub fn rotation_degrees(&self) -> f64 {
        180.0 - (self.a.x - self.b.x).atan2(self.a.y - self.b.y).to_degrees()
    }
}

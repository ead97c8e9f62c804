use std::f32::consts::TAU;

use glam::Vec3;

use super::color::Color;

/// Indexed triangle mesh with per-vertex normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

/// Line list: every consecutive pair of vertices is one segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineData {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
}

/// Node geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    TorusKnot(TorusKnot),
    Grid(Grid),
}

/// (p, q) torus knot swept with a circular tube.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TorusKnot {
    pub radius: f32,
    pub tube: f32,
    pub tubular_segments: u32,
    pub radial_segments: u32,
    pub p: u32,
    pub q: u32,
}

impl Default for TorusKnot {
    fn default() -> Self {
        Self::new(1.0, 0.4, 64, 8)
    }
}

impl TorusKnot {
    /// A (2, 3) trefoil knot.
    pub fn new(radius: f32, tube: f32, tubular_segments: u32, radial_segments: u32) -> Self {
        Self {
            radius,
            tube,
            tubular_segments: tubular_segments.max(3),
            radial_segments: radial_segments.max(3),
            p: 2,
            q: 3,
        }
    }

    fn curve(&self, u: f32) -> Vec3 {
        let (p, q) = (self.p as f32, self.q as f32);
        let qu_over_p = q / p * u;
        let cs = qu_over_p.cos();
        Vec3::new(
            self.radius * (2.0 + cs) * 0.5 * u.cos(),
            self.radius * (2.0 + cs) * 0.5 * u.sin(),
            self.radius * qu_over_p.sin() * 0.5,
        )
    }

    /// Builds the mesh. Ring seams are duplicated so every ring has
    /// `radial_segments + 1` vertices.
    pub fn build(&self) -> MeshData {
        let tubular = self.tubular_segments;
        let radial = self.radial_segments;
        let ring = radial + 1;

        let vertex_count = ((tubular + 1) * ring) as usize;
        let mut mesh = MeshData {
            positions: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity((tubular * radial * 6) as usize),
        };

        for j in 0..=tubular {
            let u = j as f32 / tubular as f32 * self.p as f32 * TAU;

            // Frenet-like frame from two nearby samples on the curve.
            let p1 = self.curve(u);
            let p2 = self.curve(u + 0.01);
            let t = p2 - p1;
            let n = p2 + p1;
            let b = t.cross(n).normalize();
            let n = b.cross(t).normalize();

            for i in 0..=radial {
                let v = i as f32 / radial as f32 * TAU;
                let cx = -self.tube * v.cos();
                let cy = self.tube * v.sin();

                let vertex = p1 + n * cx + b * cy;
                let normal = (vertex - p1).normalize();

                mesh.positions.push(vertex.to_array());
                mesh.normals.push(normal.to_array());
            }
        }

        for j in 1..=tubular {
            for i in 1..=radial {
                let a = ring * (j - 1) + (i - 1);
                let b = ring * j + (i - 1);
                let c = ring * j + i;
                let d = ring * (j - 1) + i;

                mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        mesh
    }
}

/// Square grid on the XZ plane, centered at the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Grid {
    pub size: f32,
    pub divisions: u32,
    pub center_color: Color,
    pub line_color: Color,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(10.0, 10)
    }
}

impl Grid {
    pub fn new(size: f32, divisions: u32) -> Self {
        Self {
            size,
            divisions: divisions.max(1),
            center_color: Color::from_hex(0x444444),
            line_color: Color::from_hex(0x888888),
        }
    }

    pub fn build(&self) -> LineData {
        let half = self.size / 2.0;
        let step = self.size / self.divisions as f32;
        let center = self.divisions / 2;

        let count = ((self.divisions + 1) * 4) as usize;
        let mut lines = LineData {
            positions: Vec::with_capacity(count),
            colors: Vec::with_capacity(count),
        };

        for i in 0..=self.divisions {
            let k = -half + i as f32 * step;
            let color = if i == center { self.center_color } else { self.line_color };

            lines.positions.extend_from_slice(&[
                [-half, 0.0, k],
                [half, 0.0, k],
                [k, 0.0, -half],
                [k, 0.0, half],
            ]);
            lines.colors.extend(std::iter::repeat_n(color.to_array(), 4));
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── torus knot ────────────────────────────────────────────────────────

    #[test]
    fn torus_knot_counts() {
        let mesh = TorusKnot::new(5.0, 1.0, 100, 16).build();
        assert_eq!(mesh.positions.len(), 101 * 17);
        assert_eq!(mesh.normals.len(), mesh.positions.len());
        assert_eq!(mesh.indices.len(), 100 * 16 * 6);
    }

    #[test]
    fn torus_knot_indices_in_range() {
        let mesh = TorusKnot::default().build();
        let n = mesh.positions.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn torus_knot_normals_are_unit_length() {
        let mesh = TorusKnot::new(5.0, 1.0, 32, 8).build();
        for n in &mesh.normals {
            let len = Vec3::from_array(*n).length();
            assert!((len - 1.0).abs() < 1e-4, "normal length {len}");
        }
    }

    #[test]
    fn torus_knot_surface_stays_within_bounds() {
        let knot = TorusKnot::new(5.0, 1.0, 64, 8);
        // |curve| <= radius * 1.5 in-plane, plus the tube radius.
        let limit = knot.radius * 1.5 + knot.tube + 1e-3;
        for p in knot.build().positions {
            let v = Vec3::from_array(p);
            assert!(v.truncate().length() <= limit);
        }
    }

    #[test]
    fn tiny_segment_counts_are_raised() {
        let knot = TorusKnot::new(1.0, 0.4, 0, 1);
        assert_eq!(knot.tubular_segments, 3);
        assert_eq!(knot.radial_segments, 3);
    }

    // ── grid ──────────────────────────────────────────────────────────────

    #[test]
    fn grid_line_count() {
        let lines = Grid::new(1000.0, 100).build();
        assert_eq!(lines.positions.len(), 101 * 4);
        assert_eq!(lines.colors.len(), lines.positions.len());
    }

    #[test]
    fn grid_spans_the_requested_size() {
        let lines = Grid::new(1000.0, 100).build();
        assert_eq!(lines.positions[0], [-500.0, 0.0, -500.0]);
        assert_eq!(lines.positions[1], [500.0, 0.0, -500.0]);
        assert!(lines.positions.iter().all(|p| p[1] == 0.0));
    }

    #[test]
    fn grid_center_line_uses_center_color() {
        let grid = Grid::new(10.0, 10);
        let lines = grid.build();
        let center_first_vertex = 5 * 4;
        assert_eq!(lines.colors[center_first_vertex], grid.center_color.to_array());
        assert_eq!(lines.colors[0], grid.line_color.to_array());
        assert_eq!(lines.positions[center_first_vertex], [-5.0, 0.0, 0.0]);
    }
}

//! Closed-form real-root finding for the low-degree polynomials that come
//! out of analytic ray intersections.

use crate::GEOM_EPSILON;

/// Fixed-capacity buffer of real roots, kept in ascending order.
#[derive(Debug, Copy, Clone, Default)]
pub struct Roots {
    values: [f64; 4],
    len: usize,
}

impl Roots {
    fn push(&mut self, root: f64) {
        self.values[self.len] = root;
        self.len += 1;
    }

    fn sort(&mut self) {
        self.values[..self.len].sort_by(|a, b| a.total_cmp(b));
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }

    /// Smallest root strictly greater than `min`.
    pub fn smallest_above(&self, min: f64) -> Option<f64> {
        self.as_slice().iter().copied().find(|&r| r > min)
    }
}

/// Real roots of `a·x² + b·x + c = 0`, smaller root first. Degenerate linear
/// equations (a ≈ 0) and double roots (discriminant ≈ 0) collapse to a
/// single root.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Roots {
    let mut roots = Roots::default();

    if a.abs() < GEOM_EPSILON {
        if b.abs() >= GEOM_EPSILON {
            roots.push(-c / b);
        }
        return roots;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < -GEOM_EPSILON {
        return roots;
    }

    if discriminant < GEOM_EPSILON {
        roots.push(-b / (2.0 * a));
        return roots;
    }

    let sqrt_discriminant = discriminant.sqrt();
    roots.push((-b - sqrt_discriminant) / (2.0 * a));
    roots.push((-b + sqrt_discriminant) / (2.0 * a));
    roots.sort();

    roots
}

/// Real roots of `a·x³ + b·x² + c·x + d = 0`. Normalizes to monic form, then
/// takes the trigonometric branch (three real roots) or Cardano's (one).
/// Falls back to the quadratic solver when a ≈ 0.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Roots {
    if a.abs() < GEOM_EPSILON {
        return solve_quadratic(b, c, d);
    }

    let b = b / a;
    let c = c / a;
    let d = d / a;

    let q = (b * b - 3.0 * c) / 9.0;
    let r = (2.0 * b * b * b - 9.0 * b * c + 27.0 * d) / 54.0;
    let q3 = q * q * q;
    let discriminant = q3 - r * r;

    let mut roots = Roots::default();

    if discriminant < -GEOM_EPSILON {
        let a_term = -(r.abs() + (-discriminant).sqrt()).cbrt();
        let a_term = if r < 0.0 { -a_term } else { a_term };
        let b_term = if a_term.abs() < GEOM_EPSILON {
            0.0
        } else {
            q / a_term
        };

        roots.push((a_term + b_term) - b / 3.0);
        return roots;
    }

    if q3 <= 0.0 {
        // Triple root; the trigonometric form would divide by zero.
        roots.push(-b / 3.0);
        return roots;
    }

    let theta = (r / q3.sqrt()).clamp(-1.0, 1.0).acos();
    let sqrt_q = q.sqrt();
    let tau = 2.0 * std::f64::consts::PI;

    roots.push(-2.0 * sqrt_q * (theta / 3.0).cos() - b / 3.0);
    roots.push(-2.0 * sqrt_q * ((theta + tau) / 3.0).cos() - b / 3.0);
    roots.push(-2.0 * sqrt_q * ((theta - tau) / 3.0).cos() - b / 3.0);
    roots.sort();

    roots
}

/// Real roots of `a·x⁴ + b·x³ + c·x² + d·x + e = 0` via Ferrari's resolvent
/// cubic, polished with a few Newton-Raphson steps. Declared for contract
/// completeness; no primitive currently needs it.
pub fn solve_quartic(a: f64, b: f64, c: f64, d: f64, e: f64) -> Roots {
    if a.abs() < GEOM_EPSILON {
        return solve_cubic(b, c, d, e);
    }

    let b = b / a;
    let c = c / a;
    let d = d / a;
    let e = e / a;

    // Depressed quartic y⁴ + p·y² + q·y + r with x = y − b/4.
    let p = c - 3.0 * b * b / 8.0;
    let q = d - b * c / 2.0 + b * b * b / 8.0;
    let r = e - b * d / 4.0 + b * b * c / 16.0 - 3.0 * b * b * b * b / 256.0;

    let shift = b / 4.0;
    let mut roots = Roots::default();

    if q.abs() < GEOM_EPSILON {
        // Biquadratic: solve for y².
        for y2 in solve_quadratic(1.0, p, r).as_slice() {
            if *y2 < -GEOM_EPSILON {
                continue;
            }
            let y = y2.max(0.0).sqrt();
            push_unique(&mut roots, y - shift);
            push_unique(&mut roots, -y - shift);
        }
    } else {
        // Resolvent cubic; any real root z with 2z − p > 0 splits the
        // quartic into two quadratics.
        let resolvent = solve_cubic(8.0, -4.0 * p, -8.0 * r, 4.0 * p * r - q * q);

        let z = resolvent
            .as_slice()
            .iter()
            .copied()
            .find(|z| 2.0 * z - p > GEOM_EPSILON);

        if let Some(z) = z {
            let w = (2.0 * z - p).sqrt();
            let half_q = q / (2.0 * w);

            for root in solve_quadratic(1.0, w, z - half_q).as_slice() {
                push_unique(&mut roots, root - shift);
            }
            for root in solve_quadratic(1.0, -w, z + half_q).as_slice() {
                push_unique(&mut roots, root - shift);
            }
        }
    }

    for i in 0..roots.len {
        roots.values[i] = refine_quartic(roots.values[i], b, c, d, e);
    }
    roots.sort();

    roots
}

fn push_unique(roots: &mut Roots, candidate: f64) {
    if roots.len == roots.values.len() {
        return;
    }

    for existing in roots.as_slice() {
        if (existing - candidate).abs() < GEOM_EPSILON {
            return;
        }
    }

    roots.push(candidate);
}

/// A few Newton-Raphson steps on the monic quartic.
fn refine_quartic(x: f64, b: f64, c: f64, d: f64, e: f64) -> f64 {
    let mut x = x;

    for _ in 0..4 {
        let f = (((x + b) * x + c) * x + d) * x + e;
        let df = ((4.0 * x + 3.0 * b) * x + 2.0 * c) * x + d;

        if df.abs() < GEOM_EPSILON {
            break;
        }

        let next = x - f / df;
        if (next - x).abs() < 1e-12 {
            return next;
        }
        x = next;
    }

    x
}

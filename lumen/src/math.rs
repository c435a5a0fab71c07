use cgmath::{Deg, InnerSpace, Matrix3, Vector3};

/// Normalization that maps the zero vector to itself instead of NaNs.
/// Degenerate geometry is expected to produce "no hit" downstream, not
/// errors.
pub fn normalize_safe(v: Vector3<f64>) -> Vector3<f64> {
    let len = v.magnitude();

    if len == 0.0 {
        v
    } else {
        v / len
    }
}

/// World-from-local rotation for a primitive's Euler angles in degrees:
/// Z first, then Y, then X.
pub fn rotation(angles: Vector3<f64>) -> Matrix3<f64> {
    Matrix3::from_angle_x(Deg(angles.x))
        * Matrix3::from_angle_y(Deg(angles.y))
        * Matrix3::from_angle_z(Deg(angles.z))
}

/// Local-from-world rotation, the inverse of [`rotation`]: inverse-Z, then
/// inverse-Y, then inverse-X.
pub fn rotation_inverse(angles: Vector3<f64>) -> Matrix3<f64> {
    Matrix3::from_angle_z(Deg(-angles.z))
        * Matrix3::from_angle_y(Deg(-angles.y))
        * Matrix3::from_angle_x(Deg(-angles.x))
}

/// Camera orientation from degrees of pitch (X), yaw (Y) and roll (Z),
/// applied in that order.
pub fn camera_rotation(angles: Vector3<f64>) -> Matrix3<f64> {
    Matrix3::from_angle_z(Deg(angles.z))
        * Matrix3::from_angle_y(Deg(angles.y))
        * Matrix3::from_angle_x(Deg(angles.x))
}

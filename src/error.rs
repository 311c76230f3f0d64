//! # Error Types
//!
//! Every fallible operation in the crate reports a [`GeometryError`]. Generators
//! validate their parameters before touching any buffer, so an error never leaves
//! a half-written shape behind.

use thiserror::Error;

/// Errors produced while generating, packing or uploading geometry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("slice count {slices} is below the minimum of {min}")]
    InvalidSlices { slices: u32, min: u32 },
    #[error("{name} must be finite and positive, got {value}")]
    InvalidDimension { name: &'static str, value: f32 },
    #[error("color components must lie in [0, 1], got {color:?}")]
    InvalidColor { color: [f32; 4] },
    #[error("triangle is degenerate, cannot compute a surface normal")]
    DegenerateTriangle,
    #[error("failed to allocate buffer '{label}': {reason}")]
    BufferAllocation { label: String, reason: String },
    #[error("write window overrun: reserved {reserved} floats, attempted {attempted}")]
    WindowOverrun { reserved: usize, attempted: usize },
    #[error("{floats} floats do not form whole vertex records")]
    IncompleteRecord { floats: usize },
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("{vertex_count} vertices cannot be addressed with 16-bit indices")]
    IndexOverflow { vertex_count: usize },
    #[error("failed to load model: {0}")]
    ObjLoad(String),
}

pub type GeometryResult<T> = Result<T, GeometryError>;

impl From<tobj::LoadError> for GeometryError {
    fn from(err: tobj::LoadError) -> Self {
        GeometryError::ObjLoad(err.to_string())
    }
}

/// Shared parameter checks used by every generator
pub(crate) fn check_slices(slices: u32, min: u32) -> GeometryResult<()> {
    if slices < min {
        return Err(GeometryError::InvalidSlices { slices, min });
    }
    Ok(())
}

/// Like [`check_slices`] for grid sizes held as `usize`; any count at or
/// above `min` passes, however large.
pub(crate) fn check_count(count: usize, min: u32) -> GeometryResult<()> {
    if count < min as usize {
        return Err(GeometryError::InvalidSlices {
            slices: count as u32,
            min,
        });
    }
    Ok(())
}

pub(crate) fn check_non_negative(name: &'static str, value: f32) -> GeometryResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(GeometryError::InvalidDimension { name, value });
    }
    Ok(())
}

pub(crate) fn check_positive(name: &'static str, value: f32) -> GeometryResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GeometryError::InvalidDimension { name, value });
    }
    Ok(())
}

pub(crate) fn check_finite(name: &'static str, value: f32) -> GeometryResult<()> {
    if !value.is_finite() {
        return Err(GeometryError::InvalidDimension { name, value });
    }
    Ok(())
}

pub(crate) fn check_color(color: [f32; 4]) -> GeometryResult<()> {
    if color.iter().any(|c| !c.is_finite() || *c < 0.0 || *c > 1.0) {
        return Err(GeometryError::InvalidColor { color });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_checks() {
        assert!(check_slices(3, 3).is_ok());
        assert_eq!(
            check_slices(2, 3),
            Err(GeometryError::InvalidSlices { slices: 2, min: 3 })
        );
        assert!(check_positive("radius", 1.0).is_ok());
        assert!(check_positive("radius", 0.0).is_err());
        assert!(check_positive("radius", f32::NAN).is_err());
        assert!(check_finite("height", -2.0).is_ok());
        assert!(check_finite("height", f32::INFINITY).is_err());
        assert!(check_color([1.0, 0.0, 0.0, 1.0]).is_ok());
        assert!(check_color([1.5, 0.0, 0.0, 1.0]).is_err());
    }

    #[test]
    fn test_usize_counts_are_not_truncated() {
        assert!(check_count(2, 2).is_ok());
        assert!(check_count((1usize << 32) + 1, 2).is_ok());
        assert_eq!(
            check_count(1, 2),
            Err(GeometryError::InvalidSlices { slices: 1, min: 2 })
        );
        assert!(check_non_negative("r3", 0.0).is_ok());
        assert!(check_non_negative("r3", -0.5).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = GeometryError::WindowOverrun {
            reserved: 10,
            attempted: 20,
        };
        assert_eq!(
            err.to_string(),
            "write window overrun: reserved 10 floats, attempted 20"
        );
    }
}

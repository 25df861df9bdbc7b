//! Transport-safe encoding of numeric arrays.
//!
//! An [`EncodedArray`] carries the raw native-endian bytes of an array as
//! base64 text together with a numpy-style element type name and the shape.
//! The receiver reinterprets the bytes with the declared type and shape; no
//! numeric transformation or endianness normalization happens on either
//! side.
//!
//! The `type` strings and the row-major shape order are the compatibility
//! boundary with the browser-side decoder and must not change.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::TrajviewError;

/// Element type of an encoded array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dtype {
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 8-bit integer.
    Uint8,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Unsigned 64-bit integer.
    Uint64,
    /// IEEE-754 single precision float.
    Float32,
    /// IEEE-754 double precision float.
    Float64,
}

impl Dtype {
    /// Wire name of the type, as written into [`EncodedArray::dtype`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Parse a wire name back into a [`Dtype`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "uint8" => Self::Uint8,
            "uint16" => Self::Uint16,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            _ => return None,
        })
    }

    /// Size of one element in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Int8 | Self::Uint8 => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float32 => 4,
            Self::Int64 | Self::Uint64 | Self::Float64 => 8,
        }
    }
}

/// Plain-old-data scalar that can be carried in an [`EncodedArray`].
pub trait Element: bytemuck::Pod {
    /// Wire type of this scalar.
    const DTYPE: Dtype;
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:ident),* $(,)?) => {
        $(impl Element for $ty {
            const DTYPE: Dtype = Dtype::$dtype;
        })*
    };
}

impl_element! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    f32 => Float32,
    f64 => Float64,
}

/// Owned row-major n-dimensional array.
#[derive(Debug, Clone, PartialEq)]
pub struct Array<T> {
    data: Vec<T>,
    shape: Vec<usize>,
}

impl<T: Element> Array<T> {
    /// Wrap `data` with the given shape. The shape's product must equal
    /// `data.len()`.
    pub fn new(data: Vec<T>, shape: Vec<usize>) -> Result<Self, TrajviewError> {
        check_shape(data.len(), &shape)?;
        Ok(Self { data, shape })
    }

    /// All-zero array of the given shape.
    pub fn zeros(shape: Vec<usize>) -> Result<Self, TrajviewError> {
        let len = element_count(&shape)
            .ok_or_else(|| TrajviewError::ShapeOverflow(shape.clone()))?;
        Ok(Self {
            data: vec![T::zeroed(); len],
            shape,
        })
    }

    /// Flat row-major elements.
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Dimension sizes, outermost first.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the array holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume the array, returning its flat elements.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

/// Wire form of an array: `{data, type, shape}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedArray {
    /// Base64 (standard alphabet, padded) of the raw element bytes.
    pub data: String,
    /// Element type name, e.g. `"float32"`.
    #[serde(rename = "type")]
    pub dtype: String,
    /// Dimension sizes, outermost first.
    pub shape: Vec<usize>,
}

/// Encode an array verbatim.
#[must_use]
pub fn encode<T: Element>(array: &Array<T>) -> EncodedArray {
    encode_unchecked(array.data(), array.shape())
}

/// Encode a flat slice under an explicit shape.
pub fn encode_slice<T: Element>(
    data: &[T],
    shape: &[usize],
) -> Result<EncodedArray, TrajviewError> {
    check_shape(data.len(), shape)?;
    Ok(encode_unchecked(data, shape))
}

/// Decode an [`EncodedArray`] as elements of type `T`.
///
/// Fails if the declared type is not `T`, if the payload is not valid
/// base64, or if the byte count disagrees with the declared shape.
pub fn decode<T: Element>(
    encoded: &EncodedArray,
) -> Result<Array<T>, TrajviewError> {
    if encoded.dtype != T::DTYPE.name() {
        return Err(TrajviewError::DtypeMismatch {
            expected: T::DTYPE.name(),
            found: encoded.dtype.clone(),
        });
    }

    let bytes = STANDARD.decode(&encoded.data)?;
    let size = T::DTYPE.size();
    let expected = element_count(&encoded.shape)
        .ok_or_else(|| TrajviewError::ShapeOverflow(encoded.shape.clone()))?;
    if expected.checked_mul(size) != Some(bytes.len()) {
        return Err(TrajviewError::ShapeMismatch {
            expected,
            actual: bytes.len() / size,
        });
    }

    // Unaligned reads: the decoded byte buffer carries no alignment for T.
    let data: Vec<T> = bytes
        .chunks_exact(size_of::<T>())
        .map(bytemuck::pod_read_unaligned)
        .collect();
    Ok(Array {
        data,
        shape: encoded.shape.clone(),
    })
}

// ── Internals ────────────────────────────────────────────────────────────

fn encode_unchecked<T: Element>(data: &[T], shape: &[usize]) -> EncodedArray {
    let bytes: &[u8] = bytemuck::cast_slice(data);
    EncodedArray {
        data: STANDARD.encode(bytes),
        dtype: T::DTYPE.name().to_owned(),
        shape: shape.to_vec(),
    }
}

/// Product of the dimensions; `None` on overflow. A zero-dimensional shape
/// describes a single scalar.
fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
}

fn check_shape(len: usize, shape: &[usize]) -> Result<(), TrajviewError> {
    match element_count(shape) {
        Some(expected) if expected == len => Ok(()),
        Some(expected) => Err(TrajviewError::ShapeMismatch {
            expected,
            actual: len,
        }),
        None => Err(TrajviewError::ShapeOverflow(shape.to_vec())),
    }
}

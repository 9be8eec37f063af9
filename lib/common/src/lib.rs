use num_traits::{AsPrimitive, Bounded, NumCast, PrimInt, Unsigned};

/// Trait for unsigned integer types which can be stored in an index buffer.
pub trait IndexElement:
    PrimInt + Unsigned + Bounded + AsPrimitive<usize> + AsPrimitive<u32> + std::fmt::Debug + 'static
{
    /// Whether every index of a mesh with `vertex_count` vertices can be represented by `Self`.
    #[inline]
    fn fits(vertex_count: usize) -> bool {
        let max: usize = Self::max_value().as_();
        vertex_count <= max
    }

    /// Narrow a `u32` index, returning `None` if it doesn't fit.
    #[inline]
    fn from_index(index: u32) -> Option<Self> {
        <Self as NumCast>::from(index)
    }
}

impl<P> IndexElement for P where
    P: PrimInt
        + Unsigned
        + Bounded
        + AsPrimitive<usize>
        + AsPrimitive<u32>
        + std::fmt::Debug
        + 'static
{
}

#[cfg(test)]
mod test {
    use super::IndexElement;

    #[test]
    fn fits() {
        assert!(u8::fits(255));
        assert!(!u8::fits(256));
        assert!(u16::fits(65535));
        assert!(!u16::fits(65536));
        assert!(u32::fits(65536));
    }

    #[test]
    fn narrow() {
        assert_eq!(u8::from_index(7), Some(7u8));
        assert_eq!(u8::from_index(300), None);
        assert_eq!(u16::from_index(300), Some(300u16));
    }
}

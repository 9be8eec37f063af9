use nalgebra::{Vector3, Vector4};

pub mod layout;
pub mod view;

/// The semantic role of a vertex attribute.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeUsage {
    Position,
    Normal,
    Tangent,
    Texcoord(u32),
    Color(u32),
    Joints(u32),
    Weights(u32),
    /// Application-defined data, ex. material ids or other per-polygon tags.
    Custom(u32),
}

impl AttributeUsage {
    /// Whether this attribute belongs to the skinning set (joint indices & weights).
    #[inline]
    pub const fn is_skin(self) -> bool {
        matches!(self, Self::Joints(_) | Self::Weights(_))
    }
}

/// The inner components of an [AttributeType]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeComponent {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    F32,
}

impl AttributeComponent {
    pub const fn alignment(self) -> usize {
        use std::mem::align_of;
        match self {
            AttributeComponent::U8 => align_of::<u8>(),
            AttributeComponent::U16 => align_of::<u16>(),
            AttributeComponent::U32 => align_of::<u32>(),
            AttributeComponent::I8 => align_of::<i8>(),
            AttributeComponent::I16 => align_of::<i16>(),
            AttributeComponent::I32 => align_of::<i32>(),
            AttributeComponent::F32 => align_of::<f32>(),
        }
    }

    pub const fn size(self) -> usize {
        use std::mem::size_of;
        match self {
            AttributeComponent::U8 => size_of::<u8>(),
            AttributeComponent::U16 => size_of::<u16>(),
            AttributeComponent::U32 => size_of::<u32>(),
            AttributeComponent::I8 => size_of::<i8>(),
            AttributeComponent::I16 => size_of::<i16>(),
            AttributeComponent::I32 => size_of::<i32>(),
            AttributeComponent::F32 => size_of::<f32>(),
        }
    }

    #[inline]
    pub const fn is_integral(self) -> bool {
        !matches!(self, AttributeComponent::F32)
    }
}

/// The shape of a value stored in a vertex attribute.
///
/// Values taken from the [glTF specification](https://registry.khronos.org/glTF/specs/2.0/glTF-2.0.html#accessor-data-types);
/// matrices aren't valid vertex attributes, so they're omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
}

impl AttributeType {
    #[inline]
    pub const fn alignment(self, comp: AttributeComponent) -> usize {
        // arrays have the same alignment as their component type
        comp.alignment()
    }

    pub const fn size_elements(self) -> usize {
        match self {
            AttributeType::Scalar => 1,
            AttributeType::Vec2 => 2,
            AttributeType::Vec3 => 3,
            AttributeType::Vec4 => 4,
        }
    }

    pub const fn size_bytes(self, comp: AttributeComponent) -> usize {
        comp.size() * self.size_elements()
    }

    /// The attribute type with `count` elements, if there is one.
    pub const fn from_elements(count: usize) -> Option<Self> {
        match count {
            1 => Some(AttributeType::Scalar),
            2 => Some(AttributeType::Vec2),
            3 => Some(AttributeType::Vec3),
            4 => Some(AttributeType::Vec4),
            _ => None,
        }
    }
}

/// Field type of a single vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeFormat {
    pub ty: AttributeType,
    pub comp: AttributeComponent,
}

impl AttributeFormat {
    #[inline]
    pub const fn new(ty: AttributeType, comp: AttributeComponent) -> Self {
        Self { ty, comp }
    }

    #[inline]
    pub const fn size_bytes(self) -> usize {
        self.ty.size_bytes(self.comp)
    }

    #[inline]
    pub const fn alignment(self) -> usize {
        self.ty.alignment(self.comp)
    }
}

/// Numeric types which can be stored as the components of a vertex attribute.
pub trait Component: Copy + Default + PartialEq + std::fmt::Debug + 'static {
    const COMPONENT: AttributeComponent;

    /// Read a value from the first `COMPONENT.size()` bytes of `bytes`, in native byte order.
    ///
    /// # Panics
    ///
    /// * if `bytes` is shorter than `COMPONENT.size()`
    fn read_ne(bytes: &[u8]) -> Self;

    /// Write `self` to the first `COMPONENT.size()` bytes of `bytes`, in native byte order.
    ///
    /// # Panics
    ///
    /// * if `bytes` is shorter than `COMPONENT.size()`
    fn write_ne(self, bytes: &mut [u8]);
}

mod _impl_component {
    use super::{AttributeComponent, Component};

    macro_rules! impl_component {
        ($($Target:ident: $comp:ident),+) => {
            $(
                // "size of type $Target == size of component $comp"
                static_assertions::const_assert_eq!(
                    std::mem::size_of::<$Target>(),
                    AttributeComponent::$comp.size()
                );
                impl Component for $Target {
                    const COMPONENT: AttributeComponent = AttributeComponent::$comp;

                    #[inline]
                    fn read_ne(bytes: &[u8]) -> Self {
                        let mut raw = [0u8; std::mem::size_of::<$Target>()];
                        raw.copy_from_slice(&bytes[..std::mem::size_of::<$Target>()]);
                        $Target::from_ne_bytes(raw)
                    }

                    #[inline]
                    fn write_ne(self, bytes: &mut [u8]) {
                        bytes[..std::mem::size_of::<$Target>()].copy_from_slice(&self.to_ne_bytes());
                    }
                }
            )+
        };
    }

    impl_component!(u8: U8, u16: U16, u32: U32, i8: I8, i16: I16, i32: I32, f32: F32);
}

/// The handedness of a tangent attribute
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Negative = -1,
    Positive = 1,
}

impl Handedness {
    /// Convert self to a value usable within a glTF asset
    #[inline]
    pub fn to_gltf(self) -> f32 {
        (self as i8) as f32
    }
}

/// Tangent vector of a vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tangent(pub Vector3<f32>, pub Handedness);

impl Tangent {
    #[inline]
    pub fn new(dir: Vector3<f32>, handedness: Handedness) -> Self {
        Self(dir, handedness)
    }

    #[inline]
    pub fn handedness(&self) -> Handedness {
        self.1
    }

    /// The tangent direction with the handedness folded into its sign.
    #[inline]
    pub fn signed(&self) -> Vector3<f32> {
        self.0 * self.1.to_gltf()
    }

    /// Convert self to value usable within a glTF asset
    #[inline]
    pub fn to_gltf(&self) -> Vector4<f32> {
        nalgebra::vector![self.0.x, self.0.y, self.0.z, self.1.to_gltf()]
    }
}

impl From<Tangent> for Vector3<f32> {
    fn from(value: Tangent) -> Self {
        value.0
    }
}

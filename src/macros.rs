//! Declarative macros that expand a member list into a struct (or enum), its
//! `BinaryEncode`/`BinaryDecode` implementations, and the registry
//! descriptor the generic codec is driven by. Keeping all three outputs in
//! one expansion is what guarantees the descriptor and the codec never
//! disagree about a type's members.
//!
//! Member grammar inside [`ua_structure!`]:
//!
//! ```text
//! name: Type,      required scalar
//! name: [Type],    required array        (field type Option<Vec<Type>>)
//! name: ?Type,     optional scalar       (field type Option<Type>)
//! name: ?[Type],   optional array
//! ```
//!
//! A structure with at least one optional member is registered as
//! structure-with-optional-fields and carries the u32 encoding mask on the
//! wire; plain structures have no mask.

/// Declares an OPC UA structure: the struct itself, its binary codec, and
/// its descriptor under `node_id`/`encoding_id` (both in namespace 0).
#[macro_export]
macro_rules! ua_structure {
    (
        $(#[$meta:meta])*
        pub struct $name:ident : $node_id:literal, $encoding_id:literal {
            $($fields:tt)*
        }
    ) => {
        $crate::ua_structure!(@munch
            meta [$(#[$meta])*]
            name $name
            ids ($node_id, $encoding_id)
            acc []
            rest [$($fields)*]
        );
    };

    (@munch meta $meta:tt name $name:ident ids $ids:tt acc [$($acc:tt)*]
        rest [$field:ident : ?[$ty:ty], $($rest:tt)*]) => {
        $crate::ua_structure!(@munch meta $meta name $name ids $ids
            acc [$($acc)* {$field, $ty, array, optional}] rest [$($rest)*]);
    };
    (@munch meta $meta:tt name $name:ident ids $ids:tt acc [$($acc:tt)*]
        rest [$field:ident : [$ty:ty], $($rest:tt)*]) => {
        $crate::ua_structure!(@munch meta $meta name $name ids $ids
            acc [$($acc)* {$field, $ty, array, required}] rest [$($rest)*]);
    };
    (@munch meta $meta:tt name $name:ident ids $ids:tt acc [$($acc:tt)*]
        rest [$field:ident : ?$ty:ty, $($rest:tt)*]) => {
        $crate::ua_structure!(@munch meta $meta name $name ids $ids
            acc [$($acc)* {$field, $ty, scalar, optional}] rest [$($rest)*]);
    };
    (@munch meta $meta:tt name $name:ident ids $ids:tt acc [$($acc:tt)*]
        rest [$field:ident : $ty:ty, $($rest:tt)*]) => {
        $crate::ua_structure!(@munch meta $meta name $name ids $ids
            acc [$($acc)* {$field, $ty, scalar, required}] rest [$($rest)*]);
    };

    (@munch
        meta [$(#[$meta:meta])*]
        name $name:ident
        ids ($node_id:literal, $encoding_id:literal)
        acc [$({$field:ident, $ty:ty, $arr:ident, $opt:ident})*]
        rest []
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $name {
            $(pub $field: $crate::ua_member_type!($arr $opt $ty),)*
        }

        impl $crate::types::BinaryEncode for $name {
            fn encoded_size(&self) -> usize {
                let mut size = $crate::ua_mask_size!($($opt)*);
                $(size += $crate::ua_member_size!(&self.$field, $opt);)*
                size
            }

            fn encode(
                &self,
                encoder: &mut $crate::binary::Encoder<'_>,
            ) -> Result<(), $crate::error::EncodeError> {
                let start = encoder.position();
                let result = (|| -> Result<(), $crate::error::EncodeError> {
                    #[allow(unused_mut)]
                    let mut _mask: u32 = 0;
                    #[allow(unused_mut)]
                    let mut _bit: u32 = 0;
                    $($crate::ua_mask_flag!(&self.$field, _mask, _bit, $opt);)*
                    if $crate::ua_mask_size!($($opt)*) != 0 {
                        encoder.write_u32(_mask)?;
                    }
                    $($crate::ua_encode_member!(&self.$field, encoder, $opt);)*
                    Ok(())
                })();
                if result.is_err() {
                    encoder.rewind_to(start);
                }
                result
            }
        }

        impl $crate::types::BinaryDecode for $name {
            fn decode(
                decoder: &mut $crate::binary::Decoder<'_>,
            ) -> Result<Self, $crate::error::DecodeError> {
                decoder.nested(|decoder| {
                    let _mask: u32 = if $crate::ua_mask_size!($($opt)*) != 0 {
                        decoder.read_u32()?
                    } else {
                        0
                    };
                    #[allow(unused_mut)]
                    let mut _bit: u32 = 0;
                    $(let $field = $crate::ua_decode_member!(
                        decoder, _mask, _bit, $arr $opt $ty, stringify!($field)
                    )?;)*
                    Ok(Self { $($field,)* })
                })
            }
        }

        impl $crate::types::UaType for $name {
            fn descriptor() -> &'static $crate::registry::DataTypeDescriptor {
                static MEMBERS: &[$crate::registry::DataTypeMember] = &[
                    $($crate::registry::DataTypeMember {
                        #[cfg(feature = "type-names")]
                        name: stringify!($field),
                        descriptor: <$ty as $crate::types::UaType>::descriptor,
                        is_array: $crate::ua_is_array!($arr),
                        is_optional: $crate::ua_is_optional!($opt),
                    },)*
                ];
                static DESCRIPTOR: $crate::registry::DataTypeDescriptor =
                    $crate::registry::DataTypeDescriptor {
                        #[cfg(feature = "type-names")]
                        name: stringify!($name),
                        node_id: $crate::types::NodeId::numeric(0, $node_id),
                        binary_encoding_id: $crate::types::NodeId::numeric(0, $encoding_id),
                        kind: $crate::ua_structure_kind!($($opt)*),
                        mem_size: core::mem::size_of::<$name>(),
                        members: MEMBERS,
                        decode: Some($crate::registry::decode_message::<$name>),
                    };
                &DESCRIPTOR
            }
        }

        $crate::ua_message_impl!($name);
    };
}

/// Declares an OPC UA enumeration encoded as Int32 under `node_id` in
/// namespace 0. The first variant is the `Default`.
#[macro_export]
macro_rules! ua_enumerated {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $node_id:literal {
            $first:ident = $first_value:literal,
            $($variant:ident = $value:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub enum $name {
            $first = $first_value,
            $($variant = $value,)*
        }

        impl $name {
            /// Returns the variant for a raw wire value.
            #[must_use]
            pub fn from_value(value: i32) -> Option<Self> {
                match value {
                    $first_value => Some(Self::$first),
                    $($value => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$first
            }
        }

        impl $crate::types::BinaryEncode for $name {
            fn encoded_size(&self) -> usize {
                4
            }

            fn encode(
                &self,
                encoder: &mut $crate::binary::Encoder<'_>,
            ) -> Result<(), $crate::error::EncodeError> {
                encoder.write_i32(*self as i32)
            }
        }

        impl $crate::types::BinaryDecode for $name {
            fn decode(
                decoder: &mut $crate::binary::Decoder<'_>,
            ) -> Result<Self, $crate::error::DecodeError> {
                let value = decoder.read_i32()?;
                Self::from_value(value).ok_or_else(|| {
                    $crate::error::DecodeError::invalid_enum_value(stringify!($name), value)
                })
            }
        }

        impl $crate::types::UaType for $name {
            fn descriptor() -> &'static $crate::registry::DataTypeDescriptor {
                static DESCRIPTOR: $crate::registry::DataTypeDescriptor =
                    $crate::registry::DataTypeDescriptor {
                        #[cfg(feature = "type-names")]
                        name: stringify!($name),
                        node_id: $crate::types::NodeId::numeric(0, $node_id),
                        binary_encoding_id: $crate::types::NodeId::numeric(0, $node_id),
                        kind: $crate::registry::DataTypeKind::Enum,
                        mem_size: core::mem::size_of::<$name>(),
                        members: &[],
                        decode: None,
                    };
                &DESCRIPTOR
            }
        }
    };
}

/// Declares an OPC UA union: a u32 selector (1-based, 0 = no member)
/// followed by exactly the selected member.
#[macro_export]
macro_rules! ua_union {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $node_id:literal, $encoding_id:literal {
            $($selector:literal => $variant:ident($ty:ty),)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        pub enum $name {
            /// Selector 0: no member present.
            #[default]
            None,
            $($variant($ty),)+
        }

        impl $crate::types::BinaryEncode for $name {
            fn encoded_size(&self) -> usize {
                4 + match self {
                    Self::None => 0,
                    $(Self::$variant(value) => $crate::types::BinaryEncode::encoded_size(value),)+
                }
            }

            fn encode(
                &self,
                encoder: &mut $crate::binary::Encoder<'_>,
            ) -> Result<(), $crate::error::EncodeError> {
                let start = encoder.position();
                let result = match self {
                    Self::None => encoder.write_u32(0),
                    $(Self::$variant(value) => encoder.write_u32($selector).and_then(|()| {
                        $crate::types::BinaryEncode::encode(value, encoder)
                    }),)+
                };
                if result.is_err() {
                    encoder.rewind_to(start);
                }
                result
            }
        }

        impl $crate::types::BinaryDecode for $name {
            fn decode(
                decoder: &mut $crate::binary::Decoder<'_>,
            ) -> Result<Self, $crate::error::DecodeError> {
                let selector = decoder.read_u32()?;
                decoder.nested(|decoder| match selector {
                    0 => Ok(Self::None),
                    $($selector => Ok(Self::$variant(
                        <$ty as $crate::types::BinaryDecode>::decode(decoder)?,
                    )),)+
                    other => Err($crate::error::DecodeError::invalid_union_selector(
                        stringify!($name),
                        other,
                    )),
                })
            }
        }

        impl $crate::types::UaType for $name {
            fn descriptor() -> &'static $crate::registry::DataTypeDescriptor {
                static MEMBERS: &[$crate::registry::DataTypeMember] = &[
                    $($crate::registry::DataTypeMember {
                        #[cfg(feature = "type-names")]
                        name: stringify!($variant),
                        descriptor: <$ty as $crate::types::UaType>::descriptor,
                        is_array: false,
                        is_optional: false,
                    },)+
                ];
                static DESCRIPTOR: $crate::registry::DataTypeDescriptor =
                    $crate::registry::DataTypeDescriptor {
                        #[cfg(feature = "type-names")]
                        name: stringify!($name),
                        node_id: $crate::types::NodeId::numeric(0, $node_id),
                        binary_encoding_id: $crate::types::NodeId::numeric(0, $encoding_id),
                        kind: $crate::registry::DataTypeKind::Union,
                        mem_size: core::mem::size_of::<$name>(),
                        members: MEMBERS,
                        decode: Some($crate::registry::decode_message::<$name>),
                    };
                &DESCRIPTOR
            }
        }

        $crate::ua_message_impl!($name);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! ua_message_impl {
    ($name:ident) => {
        impl $crate::types::UaMessage for $name {
            fn descriptor(&self) -> &'static $crate::registry::DataTypeDescriptor {
                <Self as $crate::types::UaType>::descriptor()
            }

            fn as_any(&self) -> &dyn core::any::Any {
                self
            }

            fn into_any(self: Box<Self>) -> Box<dyn core::any::Any> {
                self
            }

            fn clone_message(&self) -> Box<dyn $crate::types::UaMessage> {
                Box::new(self.clone())
            }

            fn eq_message(&self, other: &dyn $crate::types::UaMessage) -> bool {
                other
                    .as_any()
                    .downcast_ref::<Self>()
                    .is_some_and(|other| self == other)
            }

            fn encode_message(
                &self,
                encoder: &mut $crate::binary::Encoder<'_>,
            ) -> Result<(), $crate::error::EncodeError> {
                $crate::types::BinaryEncode::encode(self, encoder)
            }

            fn message_size(&self) -> usize {
                $crate::types::BinaryEncode::encoded_size(self)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! ua_member_type {
    (scalar required $ty:ty) => { $ty };
    (scalar optional $ty:ty) => { Option<$ty> };
    (array required $ty:ty) => { Option<Vec<$ty>> };
    (array optional $ty:ty) => { Option<Option<Vec<$ty>>> };
}

/// 4 when the member list contains an optional member (the encoding mask),
/// 0 otherwise.
#[doc(hidden)]
#[macro_export]
macro_rules! ua_mask_size {
    () => { 0usize };
    (optional $($rest:ident)*) => { 4usize };
    (required $($rest:ident)*) => { $crate::ua_mask_size!($($rest)*) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! ua_structure_kind {
    () => { $crate::registry::DataTypeKind::Structure };
    (optional $($rest:ident)*) => { $crate::registry::DataTypeKind::StructureWithOptional };
    (required $($rest:ident)*) => { $crate::ua_structure_kind!($($rest)*) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! ua_is_array {
    (array) => { true };
    (scalar) => { false };
}

#[doc(hidden)]
#[macro_export]
macro_rules! ua_is_optional {
    (optional) => { true };
    (required) => { false };
}

#[doc(hidden)]
#[macro_export]
macro_rules! ua_member_size {
    ($field:expr, required) => {
        $crate::types::BinaryEncode::encoded_size($field)
    };
    ($field:expr, optional) => {
        $field
            .as_ref()
            .map_or(0, |value| $crate::types::BinaryEncode::encoded_size(value))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! ua_mask_flag {
    ($field:expr, $mask:ident, $bit:ident, required) => {};
    ($field:expr, $mask:ident, $bit:ident, optional) => {
        if $field.is_some() {
            $mask |= 1u32 << $bit;
        }
        $bit += 1;
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! ua_encode_member {
    ($field:expr, $encoder:ident, required) => {
        if let Err(error) = $crate::types::BinaryEncode::encode($field, $encoder) {
            return Err(error);
        }
    };
    ($field:expr, $encoder:ident, optional) => {
        if let Some(value) = $field {
            if let Err(error) = $crate::types::BinaryEncode::encode(value, $encoder) {
                return Err(error);
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! ua_decode_member {
    ($decoder:ident, $mask:ident, $bit:ident, scalar required $ty:ty, $name:expr) => {
        <$ty as $crate::types::BinaryDecode>::decode($decoder)
            .map_err(|error| $crate::error::DecodeError::field($name, error))
    };
    ($decoder:ident, $mask:ident, $bit:ident, array required $ty:ty, $name:expr) => {
        <Option<Vec<$ty>> as $crate::types::BinaryDecode>::decode($decoder)
            .map_err(|error| $crate::error::DecodeError::field($name, error))
    };
    ($decoder:ident, $mask:ident, $bit:ident, scalar optional $ty:ty, $name:expr) => {{
        let present = $mask & (1u32 << $bit) != 0;
        $bit += 1;
        if present {
            <$ty as $crate::types::BinaryDecode>::decode($decoder)
                .map(Some)
                .map_err(|error| $crate::error::DecodeError::field($name, error))
        } else {
            Ok(None)
        }
    }};
    ($decoder:ident, $mask:ident, $bit:ident, array optional $ty:ty, $name:expr) => {{
        let present = $mask & (1u32 << $bit) != 0;
        $bit += 1;
        if present {
            <Option<Vec<$ty>> as $crate::types::BinaryDecode>::decode($decoder)
                .map(Some)
                .map_err(|error| $crate::error::DecodeError::field($name, error))
        } else {
            Ok(None)
        }
    }};
}

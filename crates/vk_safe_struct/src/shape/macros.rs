//! Declarative builder for the shape table
//!
//! ```text
//! NAME [@ Platform] : AshStructName [= STRUCTURE_TYPE] {
//!     member: kind(args) [if guard_fn],
//! }
//! ```
//!
//! Kinds: `string()`, `strings(count)`, `pod(Elem, count)`,
//! `pod_opt(Elem, count)`, `pod_one(Elem)`, `pod_bytes(Elem, size)`,
//! `pod_members(Elem, MEMBERS, count)`,
//! `sample_mask(samples)`, `record(SHAPE)`, `records(SHAPE, count)`,
//! `record_pointers(SHAPE, count)`, `records_opt(SHAPE, count)`,
//! `record_pointers_opt(SHAPE, count)`, `inline(SHAPE)`, `union(select_fn)`.
//! The `_opt` forms accept a null pointer whatever the count says.
//!
//! Every `NAME` needs a member list of the same name in `shape::layout`,
//! written with `members!(AshStructName { member, .. })`. `pod_members`
//! elements name their list in `shape::layout` the same way.

macro_rules! members {
    ($raw:ident { $($member:ident),* $(,)? }) => {
        &[$(
            $crate::ffi::Span {
                offset: ::std::mem::offset_of!(::ash::vk::$raw, $member),
                len: {
                    let raw = ::std::mem::MaybeUninit::<::ash::vk::$raw>::uninit();
                    // SAFETY: only the address of the member is formed, nothing is read.
                    $crate::shape::pointee_size(unsafe { ::std::ptr::addr_of!((*raw.as_ptr()).$member) })
                },
            }
        ),*]
    };
}

macro_rules! shapes {
    (@stype) => { None };
    (@stype $stype:ident) => { Some(::ash::vk::StructureType::$stype) };

    (@platform) => { $crate::shape::Platform::Any };
    (@platform $platform:ident) => { $crate::shape::Platform::$platform };

    (@guard) => { None };
    (@guard $guard:ident) => { Some($guard as $crate::shape::Guard) };

    (@kind $raw:ident, string ()) => {
        $crate::shape::FieldKind::String
    };
    (@kind $raw:ident, strings ($count:ident)) => {
        $crate::shape::FieldKind::Strings {
            count: $crate::shape::Count::U32(::std::mem::offset_of!(::ash::vk::$raw, $count)),
        }
    };
    (@kind $raw:ident, pod ($elem:ty, $count:ident)) => {
        $crate::shape::FieldKind::Pod {
            elem: $crate::shape::ElemLayout::of::<$elem>(),
            count: $crate::shape::Count::U32(::std::mem::offset_of!(::ash::vk::$raw, $count)),
        }
    };
    (@kind $raw:ident, pod_opt ($elem:ty, $count:ident)) => {
        $crate::shape::FieldKind::Pod {
            elem: $crate::shape::ElemLayout::of::<$elem>(),
            count: $crate::shape::Count::OptionalU32(::std::mem::offset_of!(::ash::vk::$raw, $count)),
        }
    };
    (@kind $raw:ident, pod_members ($elem:ty, $members:ident, $count:ident)) => {
        $crate::shape::FieldKind::Pod {
            elem: $crate::shape::ElemLayout::with_members::<$elem>($crate::shape::layout::$members),
            count: $crate::shape::Count::U32(::std::mem::offset_of!(::ash::vk::$raw, $count)),
        }
    };
    (@kind $raw:ident, pod_one ($elem:ty)) => {
        $crate::shape::FieldKind::Pod {
            elem: $crate::shape::ElemLayout::of::<$elem>(),
            count: $crate::shape::Count::One,
        }
    };
    (@kind $raw:ident, pod_bytes ($elem:ty, $size:ident)) => {
        $crate::shape::FieldKind::Pod {
            elem: $crate::shape::ElemLayout::of::<$elem>(),
            count: $crate::shape::Count::Bytes(::std::mem::offset_of!(::ash::vk::$raw, $size)),
        }
    };
    (@kind $raw:ident, sample_mask ($samples:ident)) => {
        $crate::shape::FieldKind::Pod {
            elem: $crate::shape::ElemLayout::of::<::ash::vk::SampleMask>(),
            count: $crate::shape::Count::SampleMask(::std::mem::offset_of!(::ash::vk::$raw, $samples)),
        }
    };
    (@kind $raw:ident, record ($shape:ident)) => {
        $crate::shape::FieldKind::Record { shape: &$shape }
    };
    (@kind $raw:ident, records ($shape:ident, $count:ident)) => {
        $crate::shape::FieldKind::Records {
            shape: &$shape,
            count: $crate::shape::Count::U32(::std::mem::offset_of!(::ash::vk::$raw, $count)),
        }
    };
    (@kind $raw:ident, record_pointers ($shape:ident, $count:ident)) => {
        $crate::shape::FieldKind::RecordPointers {
            shape: &$shape,
            count: $crate::shape::Count::U32(::std::mem::offset_of!(::ash::vk::$raw, $count)),
        }
    };
    (@kind $raw:ident, records_opt ($shape:ident, $count:ident)) => {
        $crate::shape::FieldKind::Records {
            shape: &$shape,
            count: $crate::shape::Count::OptionalU32(::std::mem::offset_of!(::ash::vk::$raw, $count)),
        }
    };
    (@kind $raw:ident, record_pointers_opt ($shape:ident, $count:ident)) => {
        $crate::shape::FieldKind::RecordPointers {
            shape: &$shape,
            count: $crate::shape::Count::OptionalU32(::std::mem::offset_of!(::ash::vk::$raw, $count)),
        }
    };
    (@kind $raw:ident, inline ($shape:ident)) => {
        $crate::shape::FieldKind::Inline { shape: &$shape }
    };
    (@kind $raw:ident, union ($select:ident)) => {
        $crate::shape::FieldKind::Union { select: $select }
    };

    ($(
        $(#[$meta:meta])*
        $name:ident $(@ $platform:ident)? : $raw:ident $(= $stype:ident)? {
            $( $member:ident : $kind:ident ( $($arg:tt)* ) $(if $guard:ident)? ),* $(,)?
        }
    )*) => {
        $(
            $(#[$meta])*
            pub static $name: $crate::shape::Shape = $crate::shape::Shape {
                name: concat!("Vk", stringify!($raw)),
                structure_type: shapes!(@stype $($stype)?),
                size: ::std::mem::size_of::<::ash::vk::$raw>(),
                align: ::std::mem::align_of::<::ash::vk::$raw>(),
                platform: shapes!(@platform $($platform)?),
                fields: &[
                    $(
                        $crate::shape::Field {
                            name: stringify!($member),
                            offset: ::std::mem::offset_of!(::ash::vk::$raw, $member),
                            kind: shapes!(@kind $raw, $kind ($($arg)*)),
                            when: shapes!(@guard $($guard)?),
                        },
                    )*
                ],
                members: $crate::shape::layout::$name,
            };
        )*

        /// Every shape declared in this table
        pub static ALL: &[&$crate::shape::Shape] = &[$(&$name),*];
    };
}

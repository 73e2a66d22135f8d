//! View descriptors and the pure functions that build them from attributes.

pub mod build;
pub mod common;
pub mod descriptor;
pub mod values;

pub use build::BuildContext;
pub use common::{CommonBuilder, CommonProps};
pub use descriptor::{
    BoxProps, ButtonProps, CardProps, CheckboxProps, DividerProps, IconButtonColors,
    IconButtonProps, IconProps, LazyListProps, LinearProps, Orientation, ScrollAxes, TabProps,
    TabRowProps, TextProps, ViewDescriptor, ViewKind,
};
pub use values::{PhxValues, PRIMARY_VALUE_KEY};

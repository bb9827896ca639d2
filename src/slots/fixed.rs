//! Fixed-arity layouts: one dedicated field per zone.

use crate::arena::NodeId;
use crate::slots::{ChildSlots, FixedZone, Zone};

macro_rules! fixed_layout {
    (
        $(#[$zone_meta:meta])*
        zone $zone:ident;
        $(#[$slots_meta:meta])*
        slots $slots:ident ($layout:literal);
        $( $(#[$variant_meta:meta])* $variant:ident => $field:ident = $index:literal, )+
    ) => {
        $(#[$zone_meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $zone {
            $( $(#[$variant_meta])* $variant = $index, )+
        }

        impl $zone {
            /// All zones in ordinal order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];
        }

        impl Zone for $zone {
            fn index(self) -> usize {
                self as usize
            }

            fn from_index(index: usize) -> Option<Self> {
                match index {
                    $( $index => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl FixedZone for $zone {
            const COUNT: usize = Self::ALL.len();
        }

        $(#[$slots_meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $slots {
            $( $field: Option<NodeId>, )+
        }

        impl $slots {
            $(
                pub fn $field(&self) -> Option<NodeId> {
                    self.$field
                }
            )+
        }

        impl ChildSlots for $slots {
            type Zone = $zone;

            const LAYOUT: &'static str = $layout;

            fn child_count(&self) -> usize {
                <$zone as FixedZone>::COUNT
            }

            fn child_at(&self, index: usize) -> Option<NodeId> {
                match index {
                    $( $index => self.$field, )+
                    _ => None,
                }
            }

            fn put(&mut self, index: usize, child: Option<NodeId>) -> Option<NodeId> {
                match index {
                    $( $index => std::mem::replace(&mut self.$field, child), )+
                    _ => None,
                }
            }

            fn index_of(&self, child: NodeId) -> Option<usize> {
                $(
                    if self.$field == Some(child) {
                        return Some($index);
                    }
                )+
                None
            }

            fn is_leaf(&self) -> bool {
                true $( && self.$field.is_none() )+
            }
        }
    };
}

fixed_layout! {
    /// Zones of a binary tree node.
    zone BinaryTreeZone;
    /// Two child slots.
    slots BinarySlots ("binary");
    Left => left = 0,
    Right => right = 1,
}

fixed_layout! {
    /// Zones of a quad tree node.
    zone QuadTreeZone;
    /// Four child slots, one per quadrant.
    slots QuadSlots ("quad");
    NorthWest => north_west = 0,
    NorthEast => north_east = 1,
    SouthWest => south_west = 2,
    SouthEast => south_east = 3,
}

fixed_layout! {
    /// Zones of an oct tree node.
    zone OctTreeZone;
    /// Eight child slots, one per octant.
    slots OctSlots ("oct");
    NorthWestFront => north_west_front = 0,
    NorthWestBack => north_west_back = 1,
    NorthEastFront => north_east_front = 2,
    NorthEastBack => north_east_back = 3,
    SouthWestFront => south_west_front = 4,
    SouthWestBack => south_west_back = 5,
    SouthEastFront => south_east_front = 6,
    SouthEastBack => south_east_back = 7,
}

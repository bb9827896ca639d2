//! Icosep decorator: a fixed layout plus one slot for items straddling a split.

use crate::arena::NodeId;
use crate::slots::{ChildSlots, FixedZone, Zone};

/// Zone of an icosep node: either a zone of the base layout or the extra
/// intersection slot, whose ordinal is always the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IcosepZone<Z> {
    Base(Z),
    Icosep,
}

impl<Z: FixedZone> Zone for IcosepZone<Z> {
    fn index(self) -> usize {
        match self {
            Self::Base(zone) => zone.index(),
            Self::Icosep => Z::COUNT,
        }
    }

    fn from_index(index: usize) -> Option<Self> {
        if index == Z::COUNT {
            Some(Self::Icosep)
        } else {
            Z::from_index(index).map(Self::Base)
        }
    }
}

impl<Z: FixedZone> FixedZone for IcosepZone<Z> {
    const COUNT: usize = Z::COUNT + 1;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IcosepSlots<S> {
    base: S,
    icosep: Option<NodeId>,
}

impl<S> IcosepSlots<S> {
    pub fn new(base: S) -> Self {
        Self { base, icosep: None }
    }

    pub fn base(&self) -> &S {
        &self.base
    }

    pub fn icosep(&self) -> Option<NodeId> {
        self.icosep
    }
}

impl<S> ChildSlots for IcosepSlots<S>
where
    S: ChildSlots,
    S::Zone: FixedZone,
{
    type Zone = IcosepZone<S::Zone>;

    const LAYOUT: &'static str = "icosep";

    fn layout_name() -> String {
        format!("{} {}", Self::LAYOUT, S::layout_name())
    }

    fn child_count(&self) -> usize {
        <S::Zone as FixedZone>::COUNT + 1
    }

    fn child_at(&self, index: usize) -> Option<NodeId> {
        let base = <S::Zone as FixedZone>::COUNT;
        if index < base {
            self.base.child_at(index)
        } else if index == base {
            self.icosep
        } else {
            None
        }
    }

    fn put(&mut self, index: usize, child: Option<NodeId>) -> Option<NodeId> {
        let base = <S::Zone as FixedZone>::COUNT;
        if index < base {
            self.base.put(index, child)
        } else if index == base {
            std::mem::replace(&mut self.icosep, child)
        } else {
            None
        }
    }

    fn index_of(&self, child: NodeId) -> Option<usize> {
        self.base.index_of(child).or_else(|| {
            (self.icosep == Some(child)).then_some(<S::Zone as FixedZone>::COUNT)
        })
    }

    fn is_leaf(&self) -> bool {
        self.base.is_leaf() && self.icosep.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TreeError;
    use crate::slots::{OctSlots, OctTreeZone, QuadSlots, QuadTreeZone};
    use generational_arena::Index;

    #[test]
    fn test_icosep_zone_is_last_ordinal() {
        assert_eq!(IcosepZone::<QuadTreeZone>::Icosep.index(), 4);
        assert_eq!(IcosepZone::<OctTreeZone>::Icosep.index(), 8);
        assert_eq!(
            IcosepZone::<QuadTreeZone>::from_index(1),
            Some(IcosepZone::Base(QuadTreeZone::NorthEast))
        );
        assert_eq!(IcosepZone::<QuadTreeZone>::from_index(5), None);
        assert_eq!(IcosepZone::<QuadTreeZone>::COUNT, 5);
    }

    #[test]
    fn test_icosep_slot_follows_base_slots() {
        let child = NodeId::from(Index::from_raw_parts(3, 0));
        let mut slots = IcosepSlots::<QuadSlots>::default();
        assert_eq!(slots.child_count(), 5);
        slots.put(4, Some(child));
        assert_eq!(slots.icosep(), Some(child));
        assert_eq!(slots.index_of(child), Some(4));
        assert!(slots.base().is_leaf());
        assert!(!slots.is_leaf());
        assert_eq!(IcosepSlots::new(OctSlots::default()).child_count(), 9);
    }

    #[test]
    fn test_layout_name_includes_base_layout() {
        assert_eq!(IcosepSlots::<QuadSlots>::layout_name(), "icosep quad");
        assert_eq!(IcosepSlots::<OctSlots>::layout_name(), "icosep oct");
        let err = TreeError::unsupported("insert_child", IcosepSlots::<OctSlots>::layout_name());
        assert_eq!(
            err.to_string(),
            "operation `insert_child` is not supported by icosep oct nodes"
        );
    }
}

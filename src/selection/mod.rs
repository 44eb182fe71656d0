//! # Test Selection
//!
//! Tri-state selection over test groups and their sub-tests. A group is
//! `checked` when at least one sub-test is checked and `all_children_selected`
//! when every sub-test is. Every operation returns a fresh [`SelectionTree`];
//! earlier snapshots are never touched.

use crate::catalog::GroupSpec;
use crate::error::SelectionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTest {
    /// Display label, e.g. `POST /Users`.
    pub name: String,
    /// Stable key used when binding the sub-test to a request field.
    pub state_name: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestGroup {
    pub id: u32,
    pub name: String,
    pub checked: bool,
    pub expanded: bool,
    pub all_children_selected: bool,
    pub sub: Vec<SubTest>,
}

/// What the group checkbox should look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Unchecked,
    Partial,
    Checked,
}

impl TestGroup {
    pub fn selection_state(&self) -> SelectionState {
        match (self.checked, self.all_children_selected) {
            (false, _) => SelectionState::Unchecked,
            (true, false) => SelectionState::Partial,
            (true, true) => SelectionState::Checked,
        }
    }

    pub fn checked_count(&self) -> usize {
        self.sub.iter().filter(|sub| sub.checked).count()
    }

    /// The parent checkbox acts as "select/deselect all": a partial group is
    /// completed, a fully selected group is cleared.
    fn toggled(&self) -> TestGroup {
        let mut group = self.clone();
        if !group.checked {
            group.checked = true;
            group.expanded = true;
            group.all_children_selected = true;
            set_all(&mut group.sub, true);
        } else if group.all_children_selected {
            group.checked = false;
            group.expanded = false;
            group.all_children_selected = false;
            set_all(&mut group.sub, false);
        } else {
            group.all_children_selected = true;
            group.expanded = true;
            set_all(&mut group.sub, true);
        }
        group
    }
}

fn set_all(sub: &mut [SubTest], checked: bool) {
    for test in sub {
        test.checked = checked;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionTree {
    groups: Vec<TestGroup>,
}

impl SelectionTree {
    /// Builds an all-unchecked, all-collapsed tree from the catalog.
    pub fn from_catalog(catalog: &[GroupSpec]) -> Self {
        let groups = catalog
            .iter()
            .map(|spec| TestGroup {
                id: spec.id,
                name: spec.name.to_string(),
                checked: false,
                expanded: false,
                all_children_selected: false,
                sub: spec
                    .sub
                    .iter()
                    .map(|sub| SubTest {
                        name: sub.name.to_string(),
                        state_name: sub.state_name.to_string(),
                        checked: false,
                    })
                    .collect(),
            })
            .collect();

        Self { groups }
    }

    pub fn groups(&self) -> &[TestGroup] {
        &self.groups
    }

    pub fn group(&self, group_id: u32) -> Option<&TestGroup> {
        self.groups.iter().find(|group| group.id == group_id)
    }

    /// Total number of checked sub-tests across every group.
    pub fn selected_count(&self) -> usize {
        self.groups.iter().map(TestGroup::checked_count).sum()
    }

    pub fn toggle_group(&self, group_id: u32) -> Result<Self, SelectionError> {
        self.update_group(group_id, |group| Ok(group.toggled()))
    }

    pub fn toggle_sub_test(&self, group_id: u32, index: usize) -> Result<Self, SelectionError> {
        self.update_group(group_id, |group| {
            let len = group.sub.len();
            let mut group = group.clone();
            let test = group
                .sub
                .get_mut(index)
                .ok_or(SelectionError::SubTestOutOfRange {
                    group_id,
                    index,
                    len,
                })?;
            test.checked = !test.checked;

            let checked = group.checked_count();
            group.checked = checked > 0;
            group.all_children_selected = checked == len;
            if checked == 0 {
                group.expanded = false;
            }
            Ok(group)
        })
    }

    pub fn toggle_expand(&self, group_id: u32) -> Result<Self, SelectionError> {
        self.update_group(group_id, |group| {
            Ok(TestGroup {
                expanded: !group.expanded,
                ..group.clone()
            })
        })
    }

    /// Toggles every group once, in order. Each group is toggled on its own
    /// state, so a mix of selected and unselected groups flips group by group.
    pub fn select_all(&self) -> Self {
        Self {
            groups: self.groups.iter().map(TestGroup::toggled).collect(),
        }
    }

    fn update_group(
        &self,
        group_id: u32,
        update: impl FnOnce(&TestGroup) -> Result<TestGroup, SelectionError>,
    ) -> Result<Self, SelectionError> {
        let position = self
            .groups
            .iter()
            .position(|group| group.id == group_id)
            .ok_or(SelectionError::GroupNotFound(group_id))?;

        let mut groups = self.groups.clone();
        groups[position] = update(&self.groups[position])?;
        Ok(Self { groups })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::catalog::CATALOG;

    const USERS: u32 = 4;
    const POST_USERS: usize = 2;

    fn tree() -> SelectionTree {
        SelectionTree::from_catalog(CATALOG)
    }

    fn assert_consistent(tree: &SelectionTree) {
        for group in tree.groups() {
            let checked = group.checked_count();
            assert_eq!(group.checked, checked > 0, "group {}", group.name);
            assert_eq!(
                group.all_children_selected,
                checked == group.sub.len(),
                "group {}",
                group.name
            );
        }
    }

    #[test]
    fn starts_unchecked_and_collapsed() {
        let tree = tree();
        assert_eq!(tree.groups().len(), CATALOG.len());
        assert_eq!(tree.selected_count(), 0);
        assert!(tree.groups().iter().all(|g| !g.checked && !g.expanded));
    }

    #[test]
    fn toggling_unchecked_group_selects_all_children() {
        let next = tree().toggle_group(USERS).unwrap();
        let users = next.group(USERS).unwrap();

        assert!(users.checked && users.expanded && users.all_children_selected);
        assert!(users.sub.iter().all(|sub| sub.checked));
        assert_eq!(next.selected_count(), 7);
    }

    #[test]
    fn toggling_fully_selected_group_clears_it() {
        let next = tree().toggle_group(USERS).unwrap().toggle_group(USERS).unwrap();
        let users = next.group(USERS).unwrap();

        assert_eq!(users.selection_state(), SelectionState::Unchecked);
        assert!(!users.expanded);
        assert!(users.sub.iter().all(|sub| !sub.checked));
    }

    #[test]
    fn toggling_partial_group_completes_selection() {
        let partial = tree().toggle_sub_test(USERS, POST_USERS).unwrap();
        assert_eq!(
            partial.group(USERS).unwrap().selection_state(),
            SelectionState::Partial
        );

        let next = partial.toggle_group(USERS).unwrap();
        let users = next.group(USERS).unwrap();
        assert_eq!(users.selection_state(), SelectionState::Checked);
        assert!(users.expanded);
        assert!(users.sub.iter().all(|sub| sub.checked));
    }

    #[test]
    fn operations_leave_previous_snapshot_untouched() {
        let before = tree();
        let after = before.toggle_group(USERS).unwrap();

        assert_ne!(before, after);
        assert_eq!(before, tree());
    }

    #[test]
    fn selecting_every_child_marks_group_fully_selected() {
        let mut tree = tree().toggle_expand(7).unwrap();
        for index in 0..4 {
            tree = tree.toggle_sub_test(7, index).unwrap();
        }
        let bulk = tree.group(7).unwrap();
        assert!(bulk.checked && bulk.all_children_selected);
    }

    #[test]
    fn deselecting_last_child_collapses_group() {
        let tree = tree()
            .toggle_expand(USERS)
            .unwrap()
            .toggle_sub_test(USERS, POST_USERS)
            .unwrap();
        assert!(tree.group(USERS).unwrap().expanded);

        let tree = tree.toggle_sub_test(USERS, POST_USERS).unwrap();
        let users = tree.group(USERS).unwrap();
        assert!(!users.checked);
        assert!(!users.expanded);
    }

    #[test]
    fn toggle_expand_does_not_touch_selection() {
        let tree = tree().toggle_sub_test(USERS, 0).unwrap();
        let next = tree.toggle_expand(USERS).unwrap();

        let (a, b) = (tree.group(USERS).unwrap(), next.group(USERS).unwrap());
        assert_ne!(a.expanded, b.expanded);
        assert_eq!(a.sub, b.sub);
        assert_eq!(a.checked, b.checked);
    }

    #[test]
    fn select_all_twice_returns_to_empty() {
        let once = tree().select_all();
        assert!(once.groups().iter().all(|g| g.all_children_selected));

        let twice = once.select_all();
        assert_eq!(twice.selected_count(), 0);
        assert!(twice.groups().iter().all(|g| !g.checked && !g.expanded));
    }

    #[test]
    fn select_all_toggles_each_group_on_its_own_state() {
        let tree = tree().toggle_group(1).unwrap().select_all();

        assert!(!tree.group(1).unwrap().checked);
        assert!(tree.groups()[1..].iter().all(|g| g.all_children_selected));
    }

    #[test]
    fn unknown_group_fails() {
        assert_eq!(tree().toggle_group(42), Err(SelectionError::GroupNotFound(42)));
        assert_eq!(tree().toggle_expand(0), Err(SelectionError::GroupNotFound(0)));
        assert_eq!(
            tree().toggle_sub_test(99, 0),
            Err(SelectionError::GroupNotFound(99))
        );
    }

    #[test]
    fn out_of_range_sub_test_fails() {
        assert_eq!(
            tree().toggle_sub_test(1, 1),
            Err(SelectionError::SubTestOutOfRange {
                group_id: 1,
                index: 1,
                len: 1
            })
        );
    }

    #[derive(Debug, Clone)]
    enum Op {
        Group(u32),
        SubTest(u32, usize),
        Expand(u32),
        SelectAll,
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1u32..=7).prop_map(Op::Group),
            (1u32..=7, 0usize..7).prop_map(|(id, index)| Op::SubTest(id, index)),
            (1u32..=7).prop_map(Op::Expand),
            Just(Op::SelectAll),
        ]
    }

    fn apply(tree: &SelectionTree, op: &Op) -> SelectionTree {
        match *op {
            Op::Group(id) => tree.toggle_group(id).unwrap(),
            Op::SubTest(id, index) => {
                let len = tree.group(id).unwrap().sub.len();
                tree.toggle_sub_test(id, index % len).unwrap()
            }
            Op::Expand(id) => tree.toggle_expand(id).unwrap(),
            Op::SelectAll => tree.select_all(),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn tri_state_stays_consistent(ops in proptest::collection::vec(arb_op(), 0..40)) {
            let mut tree = tree();
            for op in &ops {
                tree = apply(&tree, op);
                assert_consistent(&tree);
            }
        }

        #[test]
        fn toggle_group_from_unchecked_selects_everything(
            ops in proptest::collection::vec(arb_op(), 0..20),
            id in 1u32..=7,
        ) {
            let tree = ops.iter().fold(tree(), |tree, op| apply(&tree, op));
            let next = tree.toggle_group(id).unwrap();
            let before = tree.group(id).unwrap();
            let after = next.group(id).unwrap();

            if before.selection_state() == SelectionState::Checked {
                prop_assert_eq!(after.checked_count(), 0);
            } else {
                prop_assert!(after.all_children_selected);
                prop_assert!(after.sub.iter().all(|sub| sub.checked));
            }
        }

        #[test]
        fn sub_test_toggle_is_an_involution(
            ops in proptest::collection::vec(arb_op(), 0..20),
            id in 1u32..=7,
            raw_index in 0usize..7,
        ) {
            let tree = ops.iter().fold(tree(), |tree, op| apply(&tree, op));
            let index = raw_index % tree.group(id).unwrap().sub.len();
            let back = tree
                .toggle_sub_test(id, index)
                .unwrap()
                .toggle_sub_test(id, index)
                .unwrap();

            for (before, after) in tree.groups().iter().zip(back.groups()) {
                prop_assert_eq!(&before.sub, &after.sub);
                prop_assert_eq!(before.checked, after.checked);
                prop_assert_eq!(before.all_children_selected, after.all_children_selected);

                let others_checked = before
                    .sub
                    .iter()
                    .enumerate()
                    .any(|(i, sub)| sub.checked && !(before.id == id && i == index));
                if before.id != id || others_checked {
                    prop_assert_eq!(before.expanded, after.expanded);
                } else {
                    // Passing through zero checked children collapses the group.
                    prop_assert!(!after.expanded);
                }
            }
        }
    }
}

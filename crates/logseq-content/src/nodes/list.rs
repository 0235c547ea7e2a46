use super::{ListType, NodeId, NodeKind, PreviousLine, Tree};

/// List payload for a marker byte found in the source.
///
/// `*` and `+` are unordered, `.` and `)` ordered. A `-` list that is not
/// promoted to outline blocks is kept as an unordered `*` list, and unknown
/// markers fall back to the same.
pub fn list_kind(marker: u8) -> NodeKind {
    let (list_type, marker) = match marker {
        b'*' | b'+' => (ListType::Unordered, marker),
        b'.' | b')' => (ListType::Ordered, marker),
        _ => (ListType::Unordered, b'*'),
    };
    NodeKind::List {
        list_type,
        marker,
        previous_line: PreviousLine::Automatic,
    }
}

/// Default marker for a list type.
pub fn default_marker(list_type: ListType) -> u8 {
    match list_type {
        ListType::Ordered => b'.',
        ListType::Unordered => b'*',
    }
}

impl Tree {
    /// Changes a list's type, resetting the marker when it no longer fits.
    pub fn set_list_type(&mut self, list: NodeId, new_type: ListType) {
        if let NodeKind::List {
            list_type, marker, ..
        } = self.kind_mut(list)
        {
            let fits = match new_type {
                ListType::Ordered => matches!(*marker, b'.' | b')'),
                ListType::Unordered => matches!(*marker, b'*' | b'+'),
            };
            *list_type = new_type;
            if !fits {
                *marker = default_marker(new_type);
            }
        }
    }

    /// Changes a list's marker; the type follows the marker.
    pub fn set_list_marker(&mut self, list: NodeId, new_marker: u8) {
        if let NodeKind::List {
            list_type, marker, ..
        } = self.kind_mut(list)
            && let NodeKind::List {
                list_type: t,
                marker: m,
                ..
            } = list_kind(new_marker)
        {
            *list_type = t;
            *marker = m;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b'*', ListType::Unordered, b'*')]
    #[case(b'+', ListType::Unordered, b'+')]
    #[case(b'-', ListType::Unordered, b'*')]
    #[case(b'.', ListType::Ordered, b'.')]
    #[case(b')', ListType::Ordered, b')')]
    #[case(b'x', ListType::Unordered, b'*')]
    fn marker_mapping(#[case] input: u8, #[case] list_type: ListType, #[case] marker: u8) {
        assert_eq!(
            list_kind(input),
            NodeKind::List {
                list_type,
                marker,
                previous_line: PreviousLine::Automatic
            }
        );
    }

    #[test]
    fn switching_type_normalises_marker() {
        let mut tree = Tree::new();
        let list = tree.alloc(list_kind(b'+'));

        tree.set_list_type(list, ListType::Ordered);
        assert!(matches!(
            tree.kind(list),
            NodeKind::List {
                list_type: ListType::Ordered,
                marker: b'.',
                ..
            }
        ));

        tree.set_list_marker(list, b'+');
        assert!(matches!(
            tree.kind(list),
            NodeKind::List {
                list_type: ListType::Unordered,
                marker: b'+',
                ..
            }
        ));
    }
}

//! Property-based tests for the conversation store

use super::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Create,
    Append(String),
    /// Index into the ids issued so far
    Activate(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Create),
        "[a-z ]{1,20}".prop_map(Op::Append),
        (0usize..16).prop_map(Op::Activate),
    ]
}

fn store() -> ConversationStore {
    ConversationStore::open(ModuleInfo::new("1", "Active Listening", ""))
}

proptest! {
    #[test]
    fn prop_store_invariants_hold(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut store = store();
        let mut issued = vec![store.active_id()];

        for op in ops {
            match op {
                Op::Create => {
                    let id = store.create_conversation().id();
                    prop_assert!(issued.iter().all(|prev| id > *prev));
                    issued.push(id);
                    prop_assert_eq!(store.active_id(), id);
                }
                Op::Append(text) => {
                    let id = store.active_id();
                    let others: Vec<(ConversationId, usize)> = store
                        .conversations()
                        .filter(|c| c.id() != id)
                        .map(|c| (c.id(), c.messages().len()))
                        .collect();
                    let before = store.get(id).unwrap().last_activity();
                    let len = store.get(id).unwrap().messages().len();

                    let updated = store.append_message(id, Message::user(text.clone())).unwrap();
                    prop_assert_eq!(updated.messages().len(), len + 1);
                    prop_assert_eq!(updated.messages().last().unwrap().content(), text.as_str());
                    prop_assert!(updated.last_activity() > before);

                    for (other, other_len) in others {
                        prop_assert_eq!(store.get(other).unwrap().messages().len(), other_len);
                    }
                }
                Op::Activate(idx) => {
                    let id = issued[idx % issued.len()];
                    store.set_active(id).unwrap();
                    prop_assert_eq!(store.get_active().id(), id);
                }
            }

            // Exactly one active conversation, and it exists
            prop_assert_eq!(store.list().iter().filter(|row| row.active).count(), 1);
            prop_assert!(store.get(store.active_id()).is_ok());
            // No thread is ever empty
            prop_assert!(store.conversations().all(|c| !c.messages().is_empty()));
        }

        // Listing order is creation order
        let listed: Vec<ConversationId> = store.list().into_iter().map(|row| row.id).collect();
        prop_assert_eq!(listed, issued);
    }
}

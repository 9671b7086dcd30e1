use absa_domain::common::{EntityId, Identifiable};

pub(crate) fn contains_id<T: Identifiable>(items: &[T], id: EntityId) -> bool {
    items.iter().any(|item| item.id() == id)
}

pub(crate) fn patch_by_id<T: Identifiable>(
    items: &mut [T],
    id: EntityId,
    patch: impl FnOnce(&mut T),
) -> bool {
    match items.iter_mut().find(|item| item.id() == id) {
        Some(item) => {
            patch(item);
            true
        }
        None => false,
    }
}

pub(crate) fn remove_by_id<T: Identifiable>(items: &mut Vec<T>, id: EntityId) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

//! Read access to a set of lists during link resolution and validation.

use crate::category::CategoryClass;
use crate::config::Config;
use crate::entity::Entity;
use crate::list::EntityList;
use crate::static_data::StaticData;
use crate::types::{ItemId, ItemType, ListStyle};
use crate::value::Link;

/// A set of lists that links are resolved against.
///
/// Implemented by every container of lists (data sets, edit sets and their
/// shared list map). Items never hold a reference to their list; anything
/// that needs to follow a link takes a resolver instead.
pub trait Resolver {
    /// Style of the lists; recorded on every link resolved here.
    fn style(&self) -> ListStyle;

    /// Returns the list of a type, if registered.
    fn list(&self, item_type: ItemType) -> Option<&EntityList>;

    /// Static category type tables.
    fn statics(&self) -> &StaticData;

    /// Limits and naming conventions.
    fn config(&self) -> &Config;

    /// Looks up a live item.
    fn lookup(&self, item_type: ItemType, id: ItemId) -> Option<&Entity> {
        self.list(item_type)?
            .find_item_by_id(id)
            .filter(|item| !item.is_deleted())
    }

    /// Follows a link to its live target.
    fn target(&self, link: &Link) -> Option<&Entity> {
        self.lookup(link.item_type, link.id)
    }

    /// Class of a category, through the static type tables.
    fn class_of(&self, item: &Entity) -> Option<CategoryClass> {
        let family = item.item_type().category_family()?;
        self.statics().class_of(family, item.category_type()?)
    }
}

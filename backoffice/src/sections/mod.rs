//! Homepage sections
//!
//! Each tab has a hardcoded default; stored rows are deep-merged over it.

mod defaults;
mod enrich;
mod merge;

pub use defaults::{DEFAULT_SECTIONS, SectionDefault, find_default};
pub use enrich::{attach_items, id_list, item_limit, order_by_ids, select_categories};
pub use merge::{deep_merge, merge_section, merge_sections, validate_payload};

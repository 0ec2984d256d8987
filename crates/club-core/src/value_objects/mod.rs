//! Value objects - immutable types that represent domain concepts

mod card_code;
mod ids;
mod points;

pub use card_code::{generate_card_code, is_valid_card_code, CARD_CODE_LEN};
pub use ids::{AchievementId, EventId, IdParseError, MemberId, RegistrationId};
pub use points::Points;

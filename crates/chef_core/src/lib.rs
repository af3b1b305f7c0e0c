//! Cook-mode core: quantity scaling, kitchen timers, action dispatch and the
//! cooking session state machine. No IO; remote work leaves as [`Effect`]s and
//! comes back as [`Msg`]s.
mod action;
mod dispatch;
mod effect;
mod error;
mod msg;
mod quantity;
mod recipe;
mod session;
mod state;
mod timer;
mod update;
mod view_model;

pub use action::{ActionId, ActionKind, PendingAction, SuggestedAction};
pub use dispatch::{ActionDispatcher, DispatchOutcome, TemperatureNotice};
pub use effect::Effect;
pub use error::CookError;
pub use msg::{ChatReply, Msg, RemoteFailure};
pub use quantity::{parse_quantity, scale, serving_factor, IngredientQuantity};
pub use recipe::{Ingredient, Recipe};
pub use session::{ChatLine, CookSession, Phase, RemoteLink, Sender, SessionToken};
pub use state::AppState;
pub use timer::{format_remaining, Appliance, KitchenTimer, TimerBoard, TimerEngine, TimerId};
pub use update::update;
pub use view_model::{
    ActionRow, ConnectionStatus, CookViewModel, IngredientRow, NoticeView, TimerRow,
};

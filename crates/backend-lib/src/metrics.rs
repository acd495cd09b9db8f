// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for Prometheus metric keys
pub const GRAPHQL_REQUEST: &str = "graphql.request";
pub const SIGNUP: &str = "auth.signup";
pub const SIGNIN_SUCCESS: &str = "auth.signin.success";
pub const SIGNIN_FAILURE: &str = "auth.signin.failure";
pub const RESET_REQUESTED: &str = "auth.reset.requested";
pub const RESET_COMPLETED: &str = "auth.reset.completed";
pub const PERMISSION_DENIED: &str = "auth.permission.denied";
pub const ITEM_CREATED: &str = "item.created";
pub const ITEM_DELETED: &str = "item.deleted";
pub const CART_ADD: &str = "cart.add";
pub const ORDER_CREATED: &str = "order.created";
pub const MAIL_SENT: &str = "mail.sent";
pub const MAIL_FAILED: &str = "mail.failed";

pub mod contact_store;
pub mod linkedin_import;
pub mod make_webhooks;

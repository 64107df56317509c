pub mod data_stores;
pub mod members;
pub mod mock_email_client;
pub mod postmark_email_client;
pub mod projects;

#[cfg(test)]
mod test_support;

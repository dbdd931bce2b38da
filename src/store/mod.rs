mod error;
mod store;
mod supabase;

pub use error::StoreError;
pub use store::TaskStore;
pub use supabase::SupabaseStore;

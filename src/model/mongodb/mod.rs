mod bson;
mod collection;
mod counter;
mod errors;

pub use bson::optional_bson_datetime;
pub use collection::{ensure_indexes_exist, Coll, MongoCollection};
pub use counter::{ensure_election_id_counter_exists, Counter, ELECTION_ID_COUNTER_ID};
pub use errors::{is_duplicate_key_error, DUPLICATE_KEY};

/// All entity primary keys are UUIDs, generated by the application.
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh, time-ordered entity id.
pub fn new_entity_id() -> EntityId {
    uuid::Uuid::now_v7()
}

use crate::models::{ClassroomId, ClassroomSummary, ProfileId, TopicSummary};
use syllabus_provider::Provider;

/// Classroom and topic lists exposed to the UI layer.
///
/// Every list is returned as a provider handle. Callers subscribe to it
/// instead of polling; the handle recomputes when the caller's content locale
/// changes.
pub trait ClassroomService: Send + Sync {
    /// All classrooms in index order, each with its topic summaries.
    fn get_classroom_list(&self, profile: &ProfileId) -> Provider<Vec<ClassroomSummary>>;

    /// Playable topics of `classroom_id`, in classroom order.
    fn get_topic_list(&self, profile: &ProfileId, classroom_id: &str)
    -> Provider<Vec<TopicSummary>>;

    /// Make `classroom_id` the active classroom. Not validated against the index.
    fn switch_classroom(&self, classroom_id: &str);

    /// The active classroom, or the configured default if never switched.
    fn get_selected_classroom_id(&self) -> ClassroomId;
}

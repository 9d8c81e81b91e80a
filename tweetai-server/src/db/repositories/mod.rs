mod autobot_repository;
mod post_repository;
mod comment_repository;

pub use autobot_repository::AutobotRepository;
pub use post_repository::PostRepository;
pub use comment_repository::CommentRepository;

//! Domain logic - pure versioning rules independent of git and the filesystem

pub mod commit;
pub mod prerelease;
pub mod tag;
pub mod version;

pub use commit::ParsedCommit;
pub use prerelease::{PreRelease, PreReleaseType};
pub use tag::{TagFormat, DEFAULT_TAG_FORMAT};
pub use version::{
    create_commit_message, describe_increment, generate_version, parse_version, Increment,
    DEFAULT_BUMP_MESSAGE,
};

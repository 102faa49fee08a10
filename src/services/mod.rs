mod lastfm;
mod metadata;
mod omdb;

pub use lastfm::LastFmClient;
pub use metadata::{MetadataProvider, MovieMetadata, SoundtrackProvider};
pub use omdb::OmdbClient;

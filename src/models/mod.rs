pub mod post;
pub mod profile;
pub mod user;

pub use post::{Comment, Post};
pub use profile::{
    Education, Experience, Profile, ProfileOwner, ProfileUpdate, ProfileView, Social,
};
pub use user::{User, UserView};

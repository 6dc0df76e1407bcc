pub mod creds;
pub mod profile;
pub mod sender;
pub mod signature;

pub use creds::MessengerCredentials;
pub use profile::{MenuItem, ProfileSettings, update_profile};
pub use sender::{DEFAULT_API_BASE, MessengerSender};
pub use signature::{
    SIGNATURE_256_HEADER, SIGNATURE_HEADER, VerificationError, sign_sha1, sign_sha256,
    verify_handshake, verify_signature,
};

use once_cell::sync::Lazy;

pub const LOGO: &str = r"
 _  _   ___   __  __    _    ___          ___   ___   _
| \| | / _ \ |  \/  |  /_\  |   \  ___   / __| / _ \ | |
| .` || (_) || |\/| | / _ \ | |) ||___| | (_ || (_) || |__
|_|\_| \___/ |_|  |_|/_/ \_\|___/        \___| \__\_\|____|
";

/// The publicly visible name of the server
pub const PKG_NAME: &str = "nomad-gql";

/// The version identifier of this build
pub static PKG_VERSION: Lazy<String> = Lazy::new(|| env!("CARGO_PKG_VERSION").to_owned());

/// The environment variable which enables the GraphiQL user interface
pub const GRAPHIQL_VAR: &str = "NOMAD_GQL_ENABLE_GRAPHIQL";

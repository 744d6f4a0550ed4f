use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;

use profile_service::services::auth::{Identity, Role, TokenCodec};

/// Mint an HS256 access token for local testing against profile-service.
///
/// Tokens carry `{user_id, email, role, exp, iat, nbf}` and are signed with the
/// shared `JWT_SECRET` (read from the environment or `.env`).
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
struct Args {
    /// Subject id (becomes `user_id` / the profile's auth_id)
    #[arg(long)]
    user_id: String,

    #[arg(long)]
    email: String,

    /// user | admin | seller
    #[arg(long, default_value = "user")]
    role: Role,

    /// Lifetime in seconds (must be > 0)
    #[arg(long, default_value_t = 3600)]
    ttl_seconds: u64,

    /// Shared HS256 secret
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    secret: String,

    /// Print only the token (no extra lines)
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if args.secret.trim().is_empty() {
        bail!("JWT_SECRET must not be empty");
    }

    let identity = Identity::new(args.user_id, args.email, args.role);
    let token = TokenCodec::default()
        .sign(
            &identity,
            args.secret.as_bytes(),
            Duration::from_secs(args.ttl_seconds),
        )
        .context("failed to sign token")?;

    if args.quiet {
        println!("{}", token);
        return Ok(());
    }

    println!("token: {}", token);
    println!("user_id: {}", identity.subject_id);
    println!("role: {}", identity.role);
    println!("expires in: {}s", args.ttl_seconds);
    println!("header: Authorization: Bearer {}", token);

    Ok(())
}

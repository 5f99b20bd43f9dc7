use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("gslink {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: gslink");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "build_target: {}",
        option_env!("GSLINK_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "features: link={}, serde={}, cli=true",
        cfg!(feature = "link"),
        cfg!(feature = "serde")
    );

    Ok(SUCCESS)
}

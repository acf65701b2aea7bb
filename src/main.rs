use color_eyre::eyre;
use tga2font::cli::{self, convert, info, opt::Options};

fn main() -> eyre::Result<()> {
    let opt: Options = cli::init()?;
    let config = opt.config()?;
    if opt.info {
        return info::print_header(&config.input);
    }
    convert::run(&config)
}

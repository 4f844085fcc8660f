//! Filters addresses given as arguments against an allow list.
//!
//! ```text
//! cargo run --example ip_filter -- -allow 10.0.0.1,10.0.0.2 -allow 10.0.0.9 -v 10.0.0.2 10.0.0.3
//! ```

use flagbind::{ErrorHandling, FlagSet, FlagStruct};

#[derive(Debug, Default, FlagStruct)]
struct FilterFlags {
    #[flagbind("allow, del=',', usage='`addresses` to let through'")]
    pub allow: Vec<String>,
    #[flagbind("limit, usage='stop after this many matches (0 for no limit)'")]
    pub limit: u32,
    #[flagbind("v, usage='report rejected addresses too'")]
    pub verbose: bool,
}

#[expect(clippy::print_stdout, reason = "the example reports matches on stdout")]
fn main() {
    let mut opts = FilterFlags::default();
    let mut flags = FlagSet::new("ip_filter", ErrorHandling::ExitOnError);
    if let Err(err) = flags.bind_struct(&mut opts) {
        println!("bad flag definitions: {err}");
        return;
    }
    if flags.parse(std::env::args().skip(1)).is_err() {
        return;
    }
    let candidates = flags.args().to_vec();
    drop(flags);

    let mut matched = 0_u32;
    for address in &candidates {
        if opts.limit != 0 && matched == opts.limit {
            break;
        }
        if opts.allow.contains(address) {
            matched += 1;
            println!("allow {address}");
        } else if opts.verbose {
            println!("deny  {address}");
        }
    }
}

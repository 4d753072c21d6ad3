use clap::Parser;
use clap::ValueEnum;
use duo_hash::ChainedMap;
use duo_hash::HashMap;
use duo_hash::ProbingMap;
use duo_hash::strategy::Strategy;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Layout {
    Chained,
    Probing,
    Both,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "entries", default_value_t = 1000)]
    entries: u64,

    /// Percentage of inserted keys removed again afterwards.
    #[arg(short = 'r', long = "remove_percent", default_value_t = 0)]
    remove_percent: u64,

    #[arg(short = 'l', long = "layout", value_enum, default_value_t = Layout::Both)]
    layout: Layout,
}

fn exercise<T, P>(name: &str, mut map: HashMap<u64, u64, T, P>, args: &Args)
where
    T: Strategy<u64, u64>,
    P: duo_hash::HashPolicy<u64>,
{
    println!("== {name} ==");

    for i in 0..args.entries {
        if let Err(err) = map.insert(i, i) {
            eprintln!("insert of {i} failed: {err}");
            return;
        }
    }

    let to_remove = args.entries * args.remove_percent.min(100) / 100;
    for i in 0..to_remove {
        map.remove(&i);
    }

    println!(
        "Inserted {} keys, removed {}; {} remain in {} slots",
        args.entries,
        to_remove,
        map.len(),
        map.capacity()
    );

    map.probe_histogram().print();
    map.debug_stats().print();
    println!();
}

fn main() {
    let args = Args::parse();

    if matches!(args.layout, Layout::Chained | Layout::Both) {
        let map: ChainedMap<u64, u64> = ChainedMap::new();
        exercise("separate chaining", map, &args);
    }
    if matches!(args.layout, Layout::Probing | Layout::Both) {
        let map: ProbingMap<u64, u64> = ProbingMap::new();
        exercise("linear probing", map, &args);
    }
}

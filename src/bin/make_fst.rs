
use fst::SetBuilder;

use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

use std::path::PathBuf;
use structopt::StructOpt;

use wordtile::dictionary;

#[derive(Debug, StructOpt)]
#[structopt(name = "make_fst", about = "Create a fst file from a word list, this can be useful for faster loading")]
struct Opt {
    /// The input list. One word per line
    #[structopt(short = "i", long = "input-list", parse(from_os_str))]
    list_file: PathBuf,

    /// Where to store the compressed dictionary
    #[structopt(short = "o", long = "output-fst", parse(from_os_str))]
    fst_file: PathBuf,
}

fn main() {
    simple_logger::SimpleLogger::new().with_level(log::LevelFilter::Info).init().unwrap();

    let Opt { list_file, fst_file } = Opt::from_args();

    let start = Instant::now();
    let words = dictionary::read_word_list(&list_file).expect("reading the words list file");
    log::info!("{} words loaded in {:?}", words.len(), Instant::now() - start);

    let start = Instant::now();
    let words = dictionary::normalize_words(words);
    log::info!("{} distinct words sorted in {:?}", words.len(), Instant::now() - start);

    let start = Instant::now();
    let wtr = BufWriter::new(File::create(fst_file).expect("create the words fst file"));
    let mut build = SetBuilder::new(wtr).expect("builder writing to fst file");
    build.extend_iter(words).expect("adding words to the fst");
    build.finish().expect("finishing the fst file");
    log::info!("dictionary written in {:?}", Instant::now() - start);
}

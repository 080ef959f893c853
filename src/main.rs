use clap::{Arg, ArgMatches, Command};
use log::{debug, error, info, LevelFilter};
use env_logger;
use std::path::{Path, PathBuf};

use sjsupport::analysis::AnalysisSet;
use sjsupport::collect::load_intron_map;
use sjsupport::config::{EvidenceConfig, MotifNormalization};
use sjsupport::counts::{collect_intron_counts, save_intron_counts};
use sjsupport::genome::{annotate_splice_sites, FaidxGenome};
use sjsupport::intron_map::IntronMap;
use sjsupport::report::save_evidence_report;
use sjsupport::split::{load_star_results_dir, split_star_results_dir, LineRange};
use sjsupport::transcript::read_gene_preds;
use sjsupport::Error;

fn min_overhang_arg() -> Arg {
    Arg::new("min_overhang")
        .short('o')
        .long("min-overhang")
        .default_value("0")
        .value_parser(clap::value_parser!(u32))
        .help("Minimum maximum-overhang for a STAR splice junction call; calls below this are discarded")
}

fn motif_arg() -> Arg {
    Arg::new("motif")
        .long("motif")
        .default_value("raw")
        .value_parser(["raw", "canonical"])
        .help("STAR motif code table: 'raw' keeps reverse-complement motifs distinct, 'canonical' merges them")
}

fn evidence_inputs(cmd: Command) -> Command {
    cmd.arg(Arg::new("gene_pred")
            .required(true)
            .value_parser(clap::value_parser!(PathBuf))
            .help("Transcript annotation in genePred format"))
        .arg(Arg::new("splice_tsv")
            .required(true)
            .value_parser(clap::value_parser!(PathBuf))
            .help("Transcript splice site TSV created by the introns command"))
        .arg(Arg::new("analyses")
            .required(true)
            .value_parser(clap::value_parser!(PathBuf))
            .help("TSV of runAccession, tissue and SJ.out.tab path (relative to this file), with header"))
        .arg(min_overhang_arg())
        .arg(motif_arg())
}

fn cli() -> Command {
    Command::new("sjsupport")
        .version("0.1.0")
        .author("NaotoKubota")
        .about("Collects RNA-seq splice junction support for annotated and novel introns")
        .subcommand_required(true)
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .global(true)
            .action(clap::ArgAction::SetTrue)
            .help("Enable verbose output to print all arguments"))
        .subcommand(Command::new("introns")
            .about("Look up donor/acceptor of transcript introns and save a splice site TSV")
            .arg(Arg::new("gene_pred")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Transcript annotation in genePred format"))
            .arg(Arg::new("fasta")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Genome FASTA with a faidx index"))
            .arg(Arg::new("splice_tsv")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Output splice site TSV")))
        .subcommand(evidence_inputs(Command::new("evidence")
            .about("Report splice junction evidence for every intron"))
            .arg(Arg::new("report_tsv")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Output evidence TSV"))
            .arg(Arg::new("counts_report")
                .short('c')
                .long("counts-report")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Optional TSV of counts by annotated state and motif")))
        .subcommand(evidence_inputs(Command::new("summarize")
            .about("Summarize splice junction support by annotated state and motif"))
            .arg(Arg::new("counts_tsv")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Output counts TSV")))
        .subcommand(Command::new("split")
            .about("Split STAR SJ.out.tab files into per-chromosome files with zero-based starts")
            .arg(Arg::new("star_results")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("TSV of run_acc, mapping_param_symid, mapping_symid and sjout (relative to this file), with header"))
            .arg(Arg::new("out_dir")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Output directory, files are written as out_dir/chrom/mapping_symid.sjsup and must not exist"))
            .arg(Arg::new("start_line")
                .long("start-line")
                .value_parser(clap::value_parser!(usize))
                .help("First line of the results TSV to process; the header is line zero"))
            .arg(Arg::new("end_line")
                .long("end-line")
                .value_parser(clap::value_parser!(usize))
                .help("Half-open last line of the results TSV to process"))
            .arg(min_overhang_arg()))
}

fn path_arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a Path, Error> {
    matches
        .get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .ok_or_else(|| Error::InvalidArgument(format!("missing argument {}", name)))
}

fn evidence_config(matches: &ArgMatches) -> Result<EvidenceConfig, Box<dyn std::error::Error>> {
    let min_overhang = *matches.get_one::<u32>("min_overhang").unwrap_or(&0);
    let motif_normalization = matches
        .get_one::<String>("motif")
        .map(|s| s.parse::<MotifNormalization>())
        .transpose()?
        .unwrap_or_default();
    debug!("Minimum overhang: {}", min_overhang);
    debug!("Motif table: {}", motif_normalization);
    Ok(EvidenceConfig {
        min_overhang,
        motif_normalization,
    })
}

fn run_introns(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let gene_pred = path_arg(matches, "gene_pred")?;
    let fasta = path_arg(matches, "fasta")?;
    let splice_tsv = path_arg(matches, "splice_tsv")?;
    debug!("genePred: {}", gene_pred.display());
    debug!("FASTA: {}", fasta.display());
    debug!("Splice TSV: {}", splice_tsv.display());

    let mut intron_map = IntronMap::new();
    intron_map.load_transcripts(read_gene_preds(gene_pred)?);
    info!("Collected {} introns from {} transcripts", intron_map.len(), intron_map.transcripts().len());

    let genome = FaidxGenome::open(fasta)?;
    annotate_splice_sites(&mut intron_map, &genome)?;

    info!("Writing {}", splice_tsv.display());
    intron_map.save_transcript_splice_sites(splice_tsv)?;
    Ok(())
}

fn load_evidence(matches: &ArgMatches) -> Result<(AnalysisSet, IntronMap, EvidenceConfig), Box<dyn std::error::Error>> {
    let gene_pred = path_arg(matches, "gene_pred")?;
    let splice_tsv = path_arg(matches, "splice_tsv")?;
    let manifest = path_arg(matches, "analyses")?;
    debug!("genePred: {}", gene_pred.display());
    debug!("Splice TSV: {}", splice_tsv.display());
    debug!("Analyses: {}", manifest.display());
    let config = evidence_config(matches)?;

    // junction provenance refers into the analysis set, keep them together
    let analyses = AnalysisSet::load(manifest, "")?;
    let intron_map = load_intron_map(gene_pred, Some(splice_tsv), &analyses, &config)?;
    Ok((analyses, intron_map, config))
}

fn run_evidence(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let (_analyses, intron_map, config) = load_evidence(matches)?;
    let report_tsv = path_arg(matches, "report_tsv")?;
    info!("Writing {}", report_tsv.display());
    save_evidence_report(&intron_map, config.motif_normalization, report_tsv)?;
    if let Some(counts_tsv) = matches.get_one::<PathBuf>("counts_report") {
        info!("Writing {}", counts_tsv.display());
        let counts = collect_intron_counts(&intron_map, config.motif_normalization)?;
        save_intron_counts(counts_tsv, &counts)?;
    }
    Ok(())
}

fn run_summarize(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let (_analyses, intron_map, config) = load_evidence(matches)?;
    let counts_tsv = path_arg(matches, "counts_tsv")?;
    let counts = collect_intron_counts(&intron_map, config.motif_normalization)?;
    info!("Writing {} categories to {}", counts.len(), counts_tsv.display());
    save_intron_counts(counts_tsv, &counts)?;
    Ok(())
}

fn run_split(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let star_results_tsv = path_arg(matches, "star_results")?;
    let out_dir = path_arg(matches, "out_dir")?;
    let min_overhang = *matches.get_one::<u32>("min_overhang").unwrap_or(&0);
    debug!("STAR results: {}", star_results_tsv.display());
    debug!("Output directory: {}", out_dir.display());
    debug!("Minimum overhang: {}", min_overhang);

    let star_results = load_star_results_dir(star_results_tsv)?;
    let lines = LineRange::from_options(
        matches.get_one::<usize>("start_line").copied(),
        matches.get_one::<usize>("end_line").copied(),
        star_results.len(),
    )?;
    split_star_results_dir(&star_results, lines, min_overhang, out_dir)?;
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("introns", sub)) => run_introns(sub),
        Some(("evidence", sub)) => run_evidence(sub),
        Some(("summarize", sub)) => run_summarize(sub),
        Some(("split", sub)) => run_split(sub),
        _ => Err(Box::new(Error::InvalidArgument("no subcommand given".to_string()))),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();

    // Initialize the logger with the appropriate level
    if matches.get_flag("verbose") {
        env_logger::Builder::from_default_env()
            .filter(None, LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter(None, LevelFilter::Info)
            .init();
    }

    info!("Running sjsupport");
    run(&matches).map_err(|e| {
        error!("{}", e);
        e
    })?;
    info!("Finished processing");
    Ok(())
}

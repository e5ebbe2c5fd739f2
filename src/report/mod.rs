pub mod gff;

pub mod map_genes;
pub mod pathway;

pub mod phylip;

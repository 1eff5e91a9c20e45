pub mod emitters;

pub mod emitter;
pub mod psf;

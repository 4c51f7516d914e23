mod element;
mod reference;
mod shape;

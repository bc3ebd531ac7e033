pub mod leduc;

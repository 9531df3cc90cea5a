pub mod cat;
pub mod cd;
pub mod clear;
pub mod echo;
pub mod grep;
pub mod help;
pub mod history;
pub mod ls;
pub mod pwd;
pub mod su;

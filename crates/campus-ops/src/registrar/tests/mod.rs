mod access;
mod common;
mod referral;
mod schedule;
mod scope;

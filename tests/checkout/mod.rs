mod checkout_detached_revision;
mod checkout_with_conflicts;

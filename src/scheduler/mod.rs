pub mod role_reconcile;

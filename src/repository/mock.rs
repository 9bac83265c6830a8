//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::date_range::DateRange;
use crate::domain::admin::{Admin, NewAdmin, PasswordChange};
use crate::domain::astrologer::{Astrologer, UpdateAstrologer};
use crate::domain::consultation::ConsultationLog;
use crate::domain::puja::{PujaBooking, PujaDraft};
use crate::domain::report::{ReportOrder, UpdateReportOrder};
use crate::domain::route::{NewFolder, NewRoute, SidebarRoute, UpdateRoute};
use crate::domain::slot::{AvailableSlot, BlockedSlot, NewBlockedRange, SlotQuery};
use crate::domain::types::{
    AdminId, AstrologerId, BlockedSlotId, OrderId, Password, PujaId, RouteId,
};
use crate::models::report::ProcessSummary;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AdminReader, AdminWriter, AstrologerReader, AstrologerWriter, AuthGateway,
    ConsultationReader, Page, PujaReader, PujaWriter, ReportOrderQuery, ReportReader,
    ReportWriter, RouteReader, RouteWriter, SlotReader, SlotWriter,
};

mock! {
    pub Repository {}

    impl AuthGateway for Repository {
        fn login(&self, email: &str, password: &str) -> RepositoryResult<(String, Admin)>;
    }

    impl ConsultationReader for Repository {
        fn list_consultation_logs(&self, range: &DateRange) -> RepositoryResult<Vec<ConsultationLog>>;
    }

    impl PujaReader for Repository {
        fn list_puja_bookings(&self, range: &DateRange) -> RepositoryResult<Vec<PujaBooking>>;
        fn get_puja(&self, id: &PujaId) -> RepositoryResult<Option<PujaDraft>>;
    }

    impl PujaWriter for Repository {
        fn create_puja(&self, draft: &PujaDraft) -> RepositoryResult<()>;
        fn update_puja(&self, id: &PujaId, draft: &PujaDraft) -> RepositoryResult<()>;
    }

    impl ReportReader for Repository {
        fn list_report_orders(&self, query: &ReportOrderQuery) -> RepositoryResult<Page<ReportOrder>>;
        fn export_report_orders(&self, query: &ReportOrderQuery) -> RepositoryResult<String>;
        fn list_pending_reports(&self) -> RepositoryResult<Vec<ReportOrder>>;
    }

    impl ReportWriter for Repository {
        fn update_report_order(&self, id: &OrderId, update: &UpdateReportOrder) -> RepositoryResult<()>;
        fn process_reports(&self, ids: &[OrderId]) -> RepositoryResult<ProcessSummary>;
    }

    impl SlotReader for Repository {
        fn list_available_slots(&self, query: &SlotQuery) -> RepositoryResult<Vec<AvailableSlot>>;
        fn list_blocked_slots(&self, query: &SlotQuery) -> RepositoryResult<Vec<BlockedSlot>>;
    }

    impl SlotWriter for Repository {
        fn block_range(&self, range: &NewBlockedRange) -> RepositoryResult<()>;
        fn unblock_slot(&self, id: &BlockedSlotId) -> RepositoryResult<()>;
    }

    impl AdminReader for Repository {
        fn list_admins(&self) -> RepositoryResult<Vec<Admin>>;
    }

    impl AdminWriter for Repository {
        fn create_admin(&self, admin: &NewAdmin) -> RepositoryResult<()>;
        fn delete_admin(&self, id: &AdminId) -> RepositoryResult<()>;
        fn change_password(&self, change: &PasswordChange) -> RepositoryResult<()>;
        fn change_admin_password(&self, id: &AdminId, password: &Password) -> RepositoryResult<()>;
    }

    impl AstrologerReader for Repository {
        fn list_astrologers(&self) -> RepositoryResult<Vec<Astrologer>>;
        fn get_astrologer(&self, id: &AstrologerId) -> RepositoryResult<Option<Astrologer>>;
    }

    impl AstrologerWriter for Repository {
        fn update_astrologer(&self, update: &UpdateAstrologer) -> RepositoryResult<()>;
    }

    impl RouteReader for Repository {
        fn list_sidebar(&self) -> RepositoryResult<Vec<SidebarRoute>>;
        fn list_all_routes(&self) -> RepositoryResult<Vec<SidebarRoute>>;
    }

    impl RouteWriter for Repository {
        fn create_route(&self, route: &NewRoute) -> RepositoryResult<()>;
        fn create_folder(&self, folder: &NewFolder) -> RepositoryResult<()>;
        fn update_route(&self, id: &RouteId, route: &UpdateRoute) -> RepositoryResult<()>;
        fn delete_route(&self, id: &RouteId) -> RepositoryResult<()>;
    }
}

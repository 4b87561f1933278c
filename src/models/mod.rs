pub mod announcement;
pub mod cafeteria;
pub mod calendar;
pub mod course;
pub mod department;
pub mod enrollment;
pub mod event;
pub mod notification;
pub mod student;

pub use announcement::{Announcement, AnnouncementComment};
pub use cafeteria::{MenuCategory, MenuItem, Snack};
pub use calendar::{CalendarEntry, CalendarEntryType};
pub use course::{Course, CourseSchedule, Exam, ExamType, ScheduleEntry};
pub use department::Department;
pub use enrollment::{AvailableCourse, EnrolledCourse, Enrollment, EnrollmentStatus, WeeklySchedule};
pub use event::CampusEvent;
pub use notification::{Notification, NotificationKind, NotificationSettings};
pub use student::Student;
